use failure::{bail, Fallible};
use log::warn;
use planit::{dal::DB, router::serve_on, util::log_err};
use std::{
    net::{SocketAddr, ToSocketAddrs},
    process::exit,
};
use structopt::StructOpt;
use tokio::runtime::Builder;

fn main() {
    dotenv::dotenv().ok();

    let options = Options::from_args();
    if let Err(err) = options.start_logger() {
        warn!("Logging couldn't start: {}", err);
    }

    if let Err(err) = run(options) {
        log_err(&err);
        exit(1);
    }
}

fn run(options: Options) -> Fallible<()> {
    let serve_addr = options.serve_addr()?;
    let mut runtime = Builder::new().build()?;
    let db = DB::connect(&options.database_url)?;
    runtime.block_on(serve_on(serve_addr, db))
}

#[derive(Debug, StructOpt)]
#[structopt(raw(setting = "::structopt::clap::AppSettings::ColoredHelp"))]
pub struct Options {
    /// Disables all message output.
    #[structopt(short = "q", long = "quiet")]
    quiet: bool,

    /// Increases the verbosity. Default verbosity is info and higher.
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// The URL of the Postgres database.
    #[structopt(long = "db", env = "DATABASE_URL")]
    pub database_url: String,

    /// The host to serve on.
    #[structopt(short = "H", long = "host", env = "HOST", default_value = "::")]
    host: String,

    /// The port to serve on.
    #[structopt(short = "P", long = "port", env = "PORT", default_value = "8000")]
    port: u16,
}

impl Options {
    /// Get the address to serve on.
    pub fn serve_addr(&self) -> Fallible<SocketAddr> {
        let addrs = (&self.host as &str, self.port)
            .to_socket_addrs()?
            .collect::<Vec<_>>();
        if addrs.is_empty() {
            bail!("No matching address exists")
        } else {
            Ok(addrs[0])
        }
    }

    /// Sets up logging as specified by the `-q` and `-v` flags.
    pub fn start_logger(&self) -> Fallible<()> {
        use fern::Dispatch;
        use log::LevelFilter;

        if self.quiet {
            return Ok(());
        }

        let level = match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        Dispatch::new()
            .level(level)
            .format(move |out, message, record| {
                out.finish(format_args!("[{}] {}", record.level(), message))
            })
            .chain(std::io::stderr())
            .apply()?;
        Ok(())
    }
}
