use crate::cmd::open_store;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    // Fail before binding if the journey is missing or its config is broken.
    let name = open_store(root)?.config().name.clone();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("Journey API for '{name}' -> http://localhost:{actual_port}");

        tokio::select! {
            res = journey_server::serve_on(root, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
