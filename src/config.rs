// system configuration and command line processing

use ::clap::{arg, Command};
use log::LevelFilter;

pub const VERSION: &str = "0.1.0";

pub struct Config {
    pub log_level: LevelFilter,
    pub script: Option<String>,
    pub eval: Option<String>,
    pub plain: bool,
    pub list_builtins: bool,
}

impl Config {
    pub fn new() -> Config {
        Config {
            log_level: LevelFilter::Error,
            script: None,
            eval: None,
            plain: false,
            list_builtins: false,
        }
    }

    /// process_args handles command line argument processing using the clap library
    ///
    pub fn process_args(&mut self) -> &Config {
        let arguments = Command::new("charm")
            .version(VERSION)
            .about("An interpreter for the Charm concatenative language")
            .arg(
                arg!(--debuglevel <VALUE>)
                    .required(false)
                    .value_parser(["error", "warning", "info", "debug"]),
            )
            .arg(arg!(-f --file <VALUE> "run a script instead of the interactive loop").required(false))
            .arg(arg!(-e --eval <VALUE> "run one line of source and exit").required(false))
            .arg(arg!(--plain "read lines without the raw-mode editor").required(false))
            .arg(arg!(--builtins "print the builtin operator table and exit").required(false))
            .get_matches();

        if let Some(debuglevel) = arguments.get_one::<String>("debuglevel") {
            match debuglevel.as_str() {
                "debug" => self.log_level = LevelFilter::Debug,
                "info" => self.log_level = LevelFilter::Info,
                "warning" => self.log_level = LevelFilter::Warn,
                _ => self.log_level = LevelFilter::Error,
            }
        }

        if let Some(file) = arguments.get_one::<String>("file") {
            self.script = Some(file.clone());
        }

        if let Some(line) = arguments.get_one::<String>("eval") {
            self.eval = Some(line.clone());
        }

        if let Some(plain) = arguments.get_one::<bool>("plain") {
            self.plain = *plain;
        }

        if let Some(builtins) = arguments.get_one::<bool>("builtins") {
            self.list_builtins = *builtins;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
