use std::io;

use gateway360::{PushConfig, SmsService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("SMSPUBLI_USER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSPUBLI_USER environment variable is required",
        )
    })?;
    let password = std::env::var("SMSPUBLI_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSPUBLI_PASSWORD environment variable is required",
        )
    })?;

    let config = PushConfig::new(username, password, "+34");
    let service = SmsService::push(config);

    let credits = service.check_credits().await?;
    println!("credits left: {credits}");

    Ok(())
}
