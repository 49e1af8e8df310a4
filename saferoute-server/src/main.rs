use std::process::ExitCode;

use clap::Parser;
use saferoute_core::RouteQuery;
use saferoute_server::{
    cli::{Cli, Command},
    config::AppConfig,
    init_tracing, route_once, serve,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Command::Serve { config, bind } => AppConfig::load(&config)
            .map_err(Into::into)
            .and_then(|config| {
                tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()?
                    .block_on(serve(config, bind))
            }),
        Command::Route {
            config,
            from,
            to,
            criterion,
            geojson,
        } => AppConfig::load(&config)
            .map_err(Into::into)
            .and_then(|config| {
                route_once(&config, &RouteQuery::new(from, to, criterion), geojson)
            })
            .map(|rendered| println!("{rendered}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
