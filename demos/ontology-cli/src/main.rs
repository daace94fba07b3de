//! Query the Ontology service from the command line.
//!
//! ```text
//! ontology-cli --url https://kbase.us/services/ontology_service description GO:0008150
//! RUST_LOG=debug ontology-cli goidlist kb|g.0 kb|g.0.peg.1 --domain biological_process
//! ```
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ontology_client::{Callbacks, OntologyClient, RpcCallError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ontology-cli", version, about)]
struct Cli {
    /// Ontology service endpoint
    #[arg(
        long,
        env = "ONTOLOGY_URL",
        default_value = ontology_client::OntologyClientConfig::DEFAULT_ENDPOINT
    )]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List GO terms annotated to genes
    Goidlist(GeneQuery),
    /// Describe GO terms
    Description {
        #[arg(required = true)]
        go_ids: Vec<String>,
    },
    /// GO enrichment of a gene set
    Enrichment {
        #[command(flatten)]
        query: GeneQuery,
        /// Statistic computed by the service
        #[arg(long = "type", default_value = "hypergeometric")]
        enrichment_type: String,
    },
}

#[derive(Args, Debug)]
struct GeneQuery {
    /// Genome the genes belong to
    service_name: String,
    #[arg(required = true)]
    gene_ids: Vec<String>,
    /// GO domains to keep, all when omitted
    #[arg(long = "domain")]
    domains: Vec<String>,
    /// Evidence codes to keep, all when omitted
    #[arg(long = "evidence-code")]
    evidence_codes: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = OntologyClient::new(cli.url);
    tracing::debug!(endpoint = client.endpoint(), "created ontology client");

    let outcome = match &cli.command {
        Command::Goidlist(query) => {
            client
                .get_goidlist(
                    &query.service_name,
                    &query.gene_ids,
                    &query.domains,
                    &query.evidence_codes,
                    Callbacks::default(),
                )
                .await
        }
        Command::Description { go_ids } => {
            client.get_go_description(go_ids, Callbacks::default()).await
        }
        Command::Enrichment {
            query,
            enrichment_type,
        } => {
            client
                .get_go_enrichment(
                    &query.service_name,
                    &query.gene_ids,
                    &query.domains,
                    &query.evidence_codes,
                    enrichment_type,
                    Callbacks::default(),
                )
                .await
        }
    };

    match outcome {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).context("failed to format result")?;
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => report(&error),
    }
}

fn report(error: &RpcCallError) -> anyhow::Result<ExitCode> {
    let text = serde_json::to_string_pretty(&error.to_value()).context("failed to format error")?;
    eprintln!("{error}\n{text}");
    Ok(ExitCode::FAILURE)
}
