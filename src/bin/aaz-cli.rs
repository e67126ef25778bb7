use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "aaz-cli")]
#[command(about = "Command line client for the AAZ development server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured CLI profiles
    Profiles,
    /// List the modules of a repo (Main or Extension)
    Modules { repo: String },
    /// Show one module's command selections
    Module { repo: String, name: String },
    /// Show a command tree node, e.g. `aaz/network/vnet`
    Node { path: String },
    /// Preview portal documents for a module
    Portal {
        repo: String,
        module: String,
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Check a repo's modules against the command tree without saving
    Verify {
        repo: String,
        /// Limit to these modules
        modules: Vec<String>,
    },
    /// Refresh a repo's modules from the command tree and save them
    Regenerate { repo: String, modules: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Profiles => client.get(format!("{}/CLI/Az/Profiles", base)).send().await?,
        Commands::Modules { repo } => {
            client
                .get(format!("{}/CLI/Az/{}/Modules", base, repo))
                .send()
                .await?
        }
        Commands::Module { repo, name } => {
            client
                .get(format!("{}/CLI/Az/{}/Modules/{}", base, repo, name))
                .send()
                .await?
        }
        Commands::Node { path } => {
            client
                .get(format!(
                    "{}/CLI/PS/AAZ/Specs/CommandTree/Nodes/{}",
                    base,
                    path.trim_matches('/')
                ))
                .send()
                .await?
        }
        Commands::Portal {
            repo,
            module,
            profile,
        } => {
            let mut req = client.get(format!(
                "{}/CLI/Portal/{}/Modules/{}/Commands",
                base, repo, module
            ));
            if let Some(profile) = profile {
                req = req.query(&[("profile", profile)]);
            }
            req.send().await?
        }
        Commands::Verify { repo, modules } => {
            client
                .post(format!("{}/CLI/_cmds/Verify", base))
                .json(&maintenance_body(&repo, modules))
                .send()
                .await?
        }
        Commands::Regenerate { repo, modules } => {
            client
                .post(format!("{}/CLI/_cmds/Regenerate", base))
                .json(&maintenance_body(&repo, modules))
                .send()
                .await?
        }
    };

    print_response(res).await
}

fn maintenance_body(repo: &str, modules: Vec<String>) -> Value {
    if modules.is_empty() {
        json!({ "repo": repo })
    } else {
        json!({ "repo": repo, "modules": modules })
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
