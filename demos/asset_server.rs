// This demo serves a directory of static assets.
//
// Run `cargo run --example asset_server -- --root public/static --prefix /static`, then
// point your browser to http://localhost:3000/static/

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use hyper::server::conn::http1;
use hyper_static_assets::{StaticAssets, DEFAULT_MAX_AGE};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(about = "Serve a directory of static assets")]
struct Args {
    /// Directory to serve files from.
    #[arg(long, default_value = "public/static")]
    root: PathBuf,
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
    /// Route prefix the assets are mounted at.
    #[arg(long, default_value = "")]
    prefix: String,
    /// Cache lifespan in seconds.
    #[arg(long, default_value_t = DEFAULT_MAX_AGE)]
    max_age: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    let args = Args::parse();

    let mut assets = StaticAssets::new(&args.root)?;
    assets.prefix(&args.prefix).max_age(args.max_age);

    let listener = TcpListener::bind(args.addr).await?;
    log::info!("serving {:?} on http://{}{}/", args.root, args.addr, args.prefix);

    loop {
        let (stream, _) = listener.accept().await?;
        let assets = assets.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), assets)
                .await
            {
                log::error!("connection failed: {}", err);
            }
        });
    }
}
