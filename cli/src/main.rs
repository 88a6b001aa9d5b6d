//! # keygate-cli
//!
//! Terminal front end for a keygate server: issue keys, list and revoke
//! them, and try a key against the protected `/hello` route.
//!
//! ```text
//! keygate-cli generate
//! keygate-cli list
//! keygate-cli delete key_3f1c...
//! keygate-cli hello --api-key <key>      # or KEYGATE_API_KEY=<key>
//! ```

use clap::Parser;

use keygate_cli::config::{resolve_base_url, Cli, Command};
use keygate_cli::output::{render_generated, render_list};
use keygate_cli::{ClientError, KeygateClient};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let env_url = std::env::var("KEYGATE_API_URL").ok();
    let base_url = match resolve_base_url(cli.url.as_deref(), env_url.as_deref()) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("keygate-cli: configuration error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&base_url, cli.command).await {
        eprintln!("keygate-cli: {e}");
        std::process::exit(1);
    }
}

async fn run(base_url: &str, command: Command) -> Result<(), ClientError> {
    let client = KeygateClient::new(base_url)?;

    match command {
        Command::Generate => {
            let key = client.generate_key().await?;
            println!("{}", render_generated(&key));
            eprintln!("Copy the API key now. It will not be shown again.");
        }
        Command::List => {
            let keys = client.list_keys().await?;
            println!("{}", render_list(&keys));
        }
        Command::Delete { id } => match client.delete_key(&id).await {
            Ok(()) => println!("Deleted {id}"),
            Err(e) if e.is_not_found() => {
                eprintln!("No key with id {id}");
                return Err(e);
            }
            Err(e) => return Err(e),
        },
        Command::Hello { api_key } => match client.hello(&api_key).await {
            Ok(message) => println!("{message}"),
            Err(e) if e.is_unauthorized() => {
                eprintln!("The server rejected this key. Generate a new one and try again.");
                return Err(e);
            }
            Err(e) => return Err(e),
        },
    }

    Ok(())
}
