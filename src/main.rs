use actix_web::{App, HttpServer};
use dotenv::dotenv;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};

use std::{fs::File, io::BufReader};

use CornCare::{config::Config, routes, server::server_state::ServerState};

#[actix_web::main]
pub async fn main() -> std::io::Result<()> {
    dotenv().ok();
    Config::init();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));

    ServerState::start().await;

    let server = HttpServer::new(move || App::new().configure(routes::configure))
        .workers(Config::get().http_worker_num);

    let tls_config = &Config::get().tls;

    if tls_config.enable {
        let rust_tls_config =
            load_rustls_config(&tls_config.cert_chain_file, &tls_config.private_key_file);
        return server
            .bind_rustls("0.0.0.0:8080", rust_tls_config)?
            .run()
            .await;
    } else {
        return server.bind("0.0.0.0:8080")?.run().await;
    }
}

fn load_rustls_config(cert_path: &str, key_path: &str) -> rustls::ServerConfig {
    // init server config builder with safe defaults
    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth();

    // load TLS key/cert files
    let cert_file = &mut BufReader::new(File::open(cert_path).unwrap());
    let key_file = &mut BufReader::new(File::open(key_path).unwrap());

    // convert files to key/cert objects
    let cert_chain = certs(cert_file)
        .unwrap()
        .into_iter()
        .map(Certificate)
        .collect();
    let mut keys: Vec<PrivateKey> = pkcs8_private_keys(key_file)
        .unwrap()
        .into_iter()
        .map(PrivateKey)
        .collect();

    // exit if no keys could be parsed
    if keys.is_empty() {
        eprintln!("Could not locate PKCS 8 private keys.");
        std::process::exit(1);
    }

    config.with_single_cert(cert_chain, keys.remove(0)).unwrap()
}
