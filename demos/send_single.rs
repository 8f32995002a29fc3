use std::io;

use gateway360::{RestConfig, SmsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("GATEWAY360_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "GATEWAY360_API_KEY environment variable is required",
        )
    })?;
    let number = std::env::var("GATEWAY360_NUMBER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "GATEWAY360_NUMBER environment variable is required",
        )
    })?;
    let prefix = std::env::var("GATEWAY360_PREFIX").unwrap_or_else(|_| "+34".to_owned());
    let message = std::env::var("GATEWAY360_MESSAGE")
        .unwrap_or_else(|_| "Hello from the gateway360 example.".to_owned());

    let config = RestConfig::new(api_key, prefix).sender_name("DEMO");
    let service = SmsService::rest(config);

    service.send_single(&message, &[number.as_str()]).await?;
    println!("message handed to the gateway");

    Ok(())
}
