// charm main program

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process;

use log::error;

use charm::config::Config;
use charm::error::CharmError;
use charm::files::Input;
use charm::internals::builtin::BuiltinTable;
use charm::internals::tui::LineEditor;
use charm::parser;
use charm::runner::Runner;

/// Feed source lines to the runner until the input runs dry. The first
/// fatal error stops everything.
fn run_source(runner: &mut Runner, input: &mut Input, interactive: bool) -> Result<(), CharmError> {
    loop {
        if interactive && input.wants_prompt() {
            print!("charm> ");
            io::stdout().flush().ok();
        }
        let Some(line) = input.get_line() else {
            return Ok(());
        };
        let terms = parser::parse_line(&line)?;
        runner.run(&terms)?;
        if interactive {
            println!("ok");
        }
    }
}

fn list_builtins() {
    for b in BuiltinTable::new().iter() {
        println!("{:<12} {}", b.name, b.doc);
    }
}

fn main() {
    let mut config = Config::new();
    config.process_args();

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .init();

    if config.list_builtins {
        list_builtins();
        return;
    }

    let mut runner = Runner::new();
    let result = if let Some(line) = &config.eval {
        parser::parse_line(line).and_then(|terms| runner.run(&terms))
    } else if let Some(path) = &config.script {
        match Input::open_script(Path::new(path)) {
            Ok(mut input) => run_source(&mut runner, &mut input, false),
            Err(e) => {
                error!("cannot open {}: {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let tty = io::stdin().is_terminal();
        let mut input = if config.plain || !tty {
            Input::Stdin
        } else {
            Input::Editor(LineEditor::new())
        };
        run_source(&mut runner, &mut input, tty)
    };

    if let Err(e) = result {
        eprintln!("charm: {}", e);
        process::exit(1);
    }
}
