//! Example to echo user text messages. Runnable as:
//!
//! ```sh
//! cargo run --example echo -- BOT_TOKEN
//! ```

use botgram_client::{Client, Config, Update};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Debug).expect("failed to setup logging");

    let token = env::args().nth(1).expect("token missing");

    let client = Client::new(Config {
        token,
        params: Default::default(),
    });

    let me = client.get_me().await?;
    println!("Running as @{}...", me.username.as_deref().unwrap_or("?"));

    loop {
        match client.next_update().await? {
            Update::NewMessage(message) => {
                if let Some(text) = &message.text {
                    println!("Responding to {}", message.chat.name());
                    client.reply_to(&message, text.as_str()).send().await?;
                }
            }
            _ => {}
        }
    }
}
