use std::io;

use signalvine::{Credentials, ProgramId, SignalVineClient, convert_schema};

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
    for program in client.get_programs(true).await? {
        println!("program {} ({}), active: {}", program.id, program.name, program.active);
    }

    let tags = client.get_program_schema(&program).await?;
    for (name, entry) in convert_schema(&tags) {
        println!(
            "{name}: {} ({})",
            entry.field_type.as_str(),
            if entry.required { "required" } else { "optional" }
        );
    }

    Ok(())
}
