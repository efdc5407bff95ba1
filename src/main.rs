#[macro_use]
extern crate rocket;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wedding_invite=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[launch]
fn rocket() -> _ {
    init_tracing();
    wedding_invite::rocket()
}
