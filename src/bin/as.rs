use clap::Parser;
use colored::control;

use toyasm::assembler::driver::{assemble_file, Options};
use toyasm::cli::Args;
use toyasm::diagnostics::{NotificationBus, Severity, Sink};
use toyasm::logging::{print_error, print_warning};

fn main() {
    let args = Args::parse();

    if args.files.is_empty() {
        eprintln!("error: No input files");
        std::process::exit(1);
    }

    if args.no_color {
        control::set_override(false);
    }

    let options = Options {
        warning_as_error: args.warnings_as_errors,
        print_ast: args.print_ast,
    };

    let mut exit_status: i32 = 0;

    for path in &args.files {
        let mut bus = NotificationBus::new(args.warnings_as_errors);

        if !args.quiet {
            bus.subscribe(Severity::Error, Sink::new(false, true, |d| print_error(d)));
            if !args.no_warn {
                bus.subscribe(Severity::Warning, Sink::new(false, true, |d| print_warning(d)));
            }
        }

        match assemble_file(path, &options, &mut bus) {
            Ok(outcome) => {
                bus.notify_all_and_clear(Severity::Error);
                bus.notify_all_and_clear(Severity::Warning);
                if outcome.failed() {
                    exit_status += 1;
                }
            }
            Err(e) => {
                if !args.quiet {
                    eprintln!("error: {}", e);
                }
                exit_status += 1;
            }
        }
    }

    std::process::exit(exit_status);
}
