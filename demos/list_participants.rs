use std::io;

use signalvine::{ChunkSize, Credentials, ParticipantQuery, ProgramId, SignalVineClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::new(
        required_env("SIGNALVINE_ACCOUNT_NUMBER")?,
        required_env("SIGNALVINE_ACCOUNT_TOKEN")?,
        required_env("SIGNALVINE_ACCOUNT_SECRET")?,
    )?;
    let program = ProgramId::new(required_env("SIGNALVINE_PROGRAM_ID")?)?;

    let client = SignalVineClient::new(credentials);
    let query = ParticipantQuery {
        chunk_size: ChunkSize::new(500)?,
        include_aggregates: true,
        ..Default::default()
    };

    let records = client.get_participants(&program, query).await?;
    println!("{} participants", records.len());
    for record in records.iter().take(5) {
        println!("{}", record_line(record));
    }

    Ok(())
}

fn record_line(record: &signalvine::FlatRecord) -> String {
    record
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}
