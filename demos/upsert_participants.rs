use std::io;

use signalvine::{Credentials, ProgramId, SignalVineClient, Table, UpsertJob, UpsertOptions};

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
    let new_policy = std::env::var("SIGNALVINE_NEW_POLICY").unwrap_or_else(|_| "add".to_owned());

    let mut table = Table::new([
        "customer_id",
        "first_name",
        "last_name",
        "phone",
        "full_name",
    ]);
    table.push_row([
        "08c95df1-b233-4221-926c-5d19e61c12b2",
        "Fred",
        "Flintstone",
        "+13035550100",
        "Flintstone, Fred",
    ])?;

    let client = SignalVineClient::new(credentials);
    let job = UpsertJob::new(program, table, UpsertOptions::new(new_policy));
    let outcome = client.upsert_participants(&job).await?;
    println!("outcome: {outcome:?}");

    Ok(())
}
