//! Shared fixtures for integration tests.
//!
//! Builds a throwaway aaz / azure-cli / azure-cli-extensions layout in a
//! temp dir and a config pointing at it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aaz_dev_server::config::AppConfig;
use aaz_dev_server::{bootstrap, HttpServer};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct Fixture {
    /// Kept alive for the duration of the test.
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Fixture {
    pub fn main_modules(&self) -> PathBuf {
        main_modules_root(self.dir.path())
    }

    pub fn server(&self) -> HttpServer {
        bootstrap(self.config.clone()).expect("fixture server should start")
    }

    pub fn router(&self) -> Router {
        self.server().router()
    }
}

fn main_modules_root(root: &Path) -> PathBuf {
    root.join("azure-cli/src/azure-cli/azure/cli/command_modules")
}

pub fn command_tree() -> Value {
    json!({
        "names": ["aaz"],
        "commandGroups": {
            "network": {
                "names": ["network"],
                "help": "Manage Azure Network resources.",
                "commandGroups": {
                    "vnet": {
                        "names": ["network", "vnet"],
                        "help": "Manage virtual networks.",
                        "commands": {
                            "create": {
                                "names": ["network", "vnet", "create"],
                                "help": "Create a virtual network.",
                                "versions": [
                                    {
                                        "name": "2021-05-01",
                                        "resources": [{
                                            "id": "/subscriptions/{}/resourcegroups/{}/providers/microsoft.network/virtualnetworks/{}",
                                            "version": "2021-05-01"
                                        }]
                                    },
                                    {
                                        "name": "2022-01-01",
                                        "stage": "Preview",
                                        "resources": [{
                                            "id": "/subscriptions/{}/resourcegroups/{}/providers/microsoft.network/virtualnetworks/{}",
                                            "version": "2022-01-01"
                                        }]
                                    }
                                ]
                            },
                            "show": {
                                "names": ["network", "vnet", "show"],
                                "help": "Show a virtual network.",
                                "versions": [{ "name": "2021-05-01" }]
                            }
                        }
                    }
                }
            },
            "ssh": {
                "names": ["ssh"],
                "commands": {
                    "vm": {
                        "names": ["ssh", "vm"],
                        "help": "SSH into Azure VMs.",
                        "versions": [{ "name": "2022-01-01" }]
                    }
                }
            }
        }
    })
}

/// `network` module: `network vnet create` pinned to 2021-05-01 in `latest`,
/// without help text so a regenerate refreshes it.
pub fn network_module_file() -> Value {
    json!({
        "profiles": {
            "latest": {
                "name": "latest",
                "commandGroups": {
                    "network": {
                        "names": ["network"],
                        "commandGroups": {
                            "vnet": {
                                "names": ["network", "vnet"],
                                "commands": {
                                    "create": {
                                        "names": ["network", "vnet", "create"],
                                        "version": "2021-05-01"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub fn fixture() -> Fixture {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();

    let commands = root.join("aaz/Commands");
    fs::create_dir_all(&commands).unwrap();
    fs::write(
        commands.join("tree.json"),
        serde_json::to_vec_pretty(&command_tree()).unwrap(),
    )
    .unwrap();

    let main = main_modules_root(root);
    fs::create_dir_all(main.join("network")).unwrap();
    fs::create_dir_all(main.join("vm")).unwrap();
    fs::create_dir_all(main.join("__pycache__")).unwrap();
    fs::write(
        main.join("network/aaz_module.json"),
        serde_json::to_vec_pretty(&network_module_file()).unwrap(),
    )
    .unwrap();

    fs::create_dir_all(root.join("azure-cli-extensions/src/ssh")).unwrap();

    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.paths.aaz_path = root.join("aaz");
    config.paths.cli_path = root.join("azure-cli");
    config.paths.cli_extension_path = root.join("azure-cli-extensions");
    config.paths.portal_output_path = Some(root.join("portal"));

    Fixture { dir, config }
}

pub async fn send_request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
    })
}

/// Send a request and return its status and JSON body.
pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = send_request(app, method, uri, body).await;
    let status = response.status();
    (status, read_json(response).await)
}
