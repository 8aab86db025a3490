use std::sync::Arc;

use clap::Parser;
use tracing::info;

use linkping::config::{Args, StaticConfig};
use linkping::runtime::modes::run_server;
use linkping::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.generate_config {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    // .env 先于配置加载，供 LINKPING__* 覆盖使用
    dotenvy::dotenv().ok();

    let config = StaticConfig::load(args.config.as_deref())?;

    // guard 必须存活到进程结束
    let _log_guard = init_logging(&config.logging)?;
    info!("linkping v{} starting", env!("CARGO_PKG_VERSION"));

    run_server(Arc::new(config)).await
}
