//! Example of delayed and self-destructing messages. Runnable as:
//!
//! ```sh
//! cargo run --example vanish -- BOT_TOKEN CHAT_ID [VIDEO_FILE]
//! ```
//!
//! Sends a note that deletes itself after half a minute, and a second one
//! ten seconds from now without making you wait for it. With a video file
//! given, it is sent along with probed metadata and a generated thumbnail
//! (both need ffmpeg installed).

use botgram_client::{Client, Config};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info).expect("failed to setup logging");

    let mut args = env::args().skip(1);
    let token = args.next().expect("token missing");
    let chat = args
        .next()
        .expect("chat id missing")
        .parse::<i64>()
        .expect("chat id invalid");
    let video = args.next();

    let client = Client::new(Config {
        token,
        params: Default::default(),
    });

    let sent = client
        .send_message(chat, "this message self-destructs in 30 seconds")
        .delete_after(Duration::from_secs(30))
        .send()
        .await?;
    println!(
        "Delivered message {}; its deletion is already on its way",
        sent.message().expect("sent without a delay").id
    );

    let sent = client
        .send_message(chat, "and this one was written 10 seconds ago")
        .after(Duration::from_secs(10))
        .send()
        .await?;
    println!("Got control back immediately: scheduled = {}", sent.is_scheduled());

    if let Some(path) = video {
        client
            .send_video(chat, &path)
            .probe()
            .auto_thumbnail()
            .caption("with metadata and thumbnail from ffmpeg")
            .send()
            .await?;
        println!("Video sent");
    }

    // Give the deferred send a chance to run before the process exits;
    // detached timers do not keep the runtime alive.
    tokio::time::sleep(Duration::from_secs(11)).await;
    Ok(())
}
