//! rmq-remoting CLI
//!
//! Sends a single remoting command to a broker or name server and prints
//! the response.

use std::collections::HashMap;

use clap::Parser;
use rmq_remoting::{Command, Config, RemotingClient, RequestCode};
use tracing_subscriber::{fmt, EnvFilter};

/// rmq-remoting CLI
#[derive(Parser, Debug)]
#[command(name = "rmq-remoting-cli")]
#[command(about = "Send one remoting command to a RocketMQ broker or name server")]
#[command(version)]
struct Args {
    /// Target address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:9876")]
    addr: String,

    /// Request code (defaults to GET_BROKER_CLUSTER_INFO)
    #[arg(short, long, default_value_t = RequestCode::GET_BROKER_CLUSTER_INFO)]
    code: i32,

    /// Extension field, repeatable
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Request body
    #[arg(short, long)]
    body: Option<String>,

    /// Request timeout in milliseconds
    #[arg(short, long, default_value = "3000")]
    timeout_ms: u64,

    /// Send one-way and do not wait for a response
    #[arg(long)]
    oneway: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rmq_remoting=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let config = Config::builder().request_timeout_ms(args.timeout_ms).build();
    let client = match RemotingClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let fields: HashMap<String, String> = args.fields.into_iter().collect();
    let mut request = Command::request(args.code, fields);
    if let Some(body) = args.body {
        request = request.with_body(body);
    }

    if args.oneway {
        if let Err(e) = client.invoke_oneway(&args.addr, &request) {
            tracing::error!("One-way request to {} failed: {}", args.addr, e);
            client.close();
            std::process::exit(1);
        }
        tracing::info!("Sent one-way request opaque={} to {}", request.opaque(), args.addr);
        client.close();
        return;
    }

    let response = match client.invoke_with_default_timeout(&args.addr, &request) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Request to {} failed: {}", args.addr, e);
            client.close();
            std::process::exit(1);
        }
    };

    println!("code:   {}", response.code());
    println!("opaque: {}", response.opaque());
    if !response.remark().is_empty() {
        println!("remark: {}", response.remark());
    }
    for (key, value) in response.ext_fields() {
        println!("field:  {}={}", key, value);
    }
    if !response.body().is_empty() {
        println!("{}", String::from_utf8_lossy(response.body()));
    }

    client.close();
}
