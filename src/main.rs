use clap::Parser;

use chatcaster::cli::Cli;
use chatcaster::config::load_config;
use chatcaster::errors::ChatcasterError;
use chatcaster::runtime::modes::{self, Mode};

fn report_error(e: &ChatcasterError) {
    #[cfg(feature = "server")]
    eprintln!("{}", e.format_colored());
    #[cfg(not(feature = "server"))]
    eprintln!("{}", e.format_simple());
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 配置只加载一次，之后通过 get_config() 读取
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    };

    match modes::detect_mode(cli.command.as_ref()) {
        #[cfg(feature = "server")]
        Mode::Server => {
            // guard 必须存活到进程结束，否则缓冲中的日志会丢失
            let _guard = match chatcaster::system::logging::init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    report_error(&e);
                    std::process::exit(1);
                }
            };
            modes::run_server().await
        }
        #[cfg(feature = "cli")]
        Mode::Cli => {
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = modes::run_cli_command(command) {
                report_error(&e);
                std::process::exit(1);
            }
            Ok(())
        }
        Mode::Unknown => {
            let _ = config;
            anyhow::bail!("No runtime mode enabled. Build with the `server` feature.")
        }
    }
}
