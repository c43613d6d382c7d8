use focus_timer::{app, notify::Notifier, ClientConfig};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    info!(
        base_url = %config.base_url,
        variant = %config.controller.variant,
        "starting focus timer"
    );

    let notifier = Notifier::new(config.notifications);
    let permission = notifier.request_permission();
    info!(?permission, "notifications");

    let controller = app::build(&config)?;
    controller.set_template_id(config.template_id).await;
    controller.refresh().await;

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = app::run(&controller, input) => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    controller.shutdown().await;
    info!("bye");
    Ok(())
}
