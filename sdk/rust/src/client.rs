use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Module listing entry as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub name: String,
    pub folder: String,
    pub repo: String,
}

/// Error body the server sends with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ClientError {
    Transport(reqwest::Error),
    /// The server answered with an error status.
    Api { status: StatusCode, body: ApiFailure },
    /// The server answered with something that is not the expected JSON.
    Decode { status: StatusCode, text: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "request failed: {}", e),
            ClientError::Api { status, body } => {
                write!(f, "server returned {} {}: {}", status, body.code, body.message)
            }
            ClientError::Decode { status, text } => {
                write!(f, "unexpected response ({}): {}", status, text)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

impl ClientError {
    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Transport(e) => e.status(),
            ClientError::Api { status, .. } | ClientError::Decode { status, .. } => Some(*status),
        }
    }
}

pub struct AazClient {
    client: Client,
    base_url: String,
}

impl AazClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /CLI/Az/Profiles`
    pub async fn profiles(&self) -> Result<Vec<String>, ClientError> {
        self.get("/CLI/Az/Profiles").await
    }

    /// `GET /CLI/Az/{repo}/Modules`
    pub async fn list_modules(&self, repo: &str) -> Result<Vec<ModuleSummary>, ClientError> {
        self.get(&format!("/CLI/Az/{}/Modules", repo)).await
    }

    /// `GET /CLI/Az/{repo}/Modules/{module}`
    pub async fn get_module(&self, repo: &str, module: &str) -> Result<Value, ClientError> {
        self.get(&format!("/CLI/Az/{}/Modules/{}", repo, module)).await
    }

    /// `POST /CLI/Az/{repo}/Modules`
    pub async fn create_module(&self, repo: &str, name: &str) -> Result<Value, ClientError> {
        let resp = self
            .client
            .post(self.url(&format!("/CLI/Az/{}/Modules", repo)))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        decode(resp).await
    }

    /// `GET /CLI/PS/{repo}/Modules`
    pub async fn ps_list_modules(&self, repo: &str) -> Result<Vec<ModuleSummary>, ClientError> {
        self.get(&format!("/CLI/PS/{}/Modules", repo)).await
    }

    /// `GET /CLI/PS/AAZ/Specs/CommandTree/Nodes/{names}`; `names` is
    /// slash separated and starts at `aaz`.
    pub async fn get_node(&self, names: &str) -> Result<Value, ClientError> {
        self.get(&format!("/CLI/PS/AAZ/Specs/CommandTree/Nodes/{}", names))
            .await
    }

    /// `GET /CLI/Portal/{repo}/Modules/{module}/Commands`
    pub async fn portal_commands(
        &self,
        repo: &str,
        module: &str,
        profile: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut req = self
            .client
            .get(self.url(&format!("/CLI/Portal/{}/Modules/{}/Commands", repo, module)));
        if let Some(profile) = profile {
            req = req.query(&[("profile", profile)]);
        }
        decode(req.send().await?).await
    }

    /// `POST /CLI/_cmds/Verify`
    pub async fn verify(&self, repo: &str, modules: Option<&[&str]>) -> Result<Value, ClientError> {
        let resp = self
            .client
            .post(self.url("/CLI/_cmds/Verify"))
            .json(&json!({ "repo": repo, "modules": modules }))
            .send()
            .await?;
        decode(resp).await
    }

    /// Raw GET for paths the typed methods do not cover.
    pub async fn get_raw(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client.get(self.url(path)).send().await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return match serde_json::from_str::<ApiFailure>(&text) {
            Ok(body) => Err(ClientError::Api { status, body }),
            Err(_) => Err(ClientError::Decode { status, text }),
        };
    }

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) => Err(ClientError::Decode { status, text }),
    }
}
