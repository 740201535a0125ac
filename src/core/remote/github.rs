//! GitHub Actions secrets and variables.
//!
//! Talks to the REST API with a blocking client. The endpoint defaults to
//! `https://api.github.com` and can be redirected with `OPENV_GITHUB_API`
//! (GitHub Enterprise, local fakes).
//!
//! Environment secrets are addressed by numeric repository id, so a client
//! for a repository environment looks the repository up once when built.

use std::env;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use zeroize::Zeroizing;

use super::{Platform, ScopeClient, Written};
use crate::core::cipher::{PublicKeyMaterial, SealedSecret};
use crate::core::constants::{ENV_GITHUB_API, GITHUB_API, GITHUB_API_VERSION, HTTP_TIMEOUT_SECS};
use crate::core::domain::Scope;
use crate::error::{Result, SyncError};

const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Visibility given to organization secrets and variables openv creates.
const DEFAULT_VISIBILITY: &str = "private";

/// Authenticated GitHub API handle.
pub struct GitHub {
    client: Client,
    api: String,
    token: Zeroizing<String>,
}

impl GitHub {
    /// Create a handle for `token`, honoring `OPENV_GITHUB_API`.
    pub fn new(token: &str) -> Result<Self> {
        let api = env::var(ENV_GITHUB_API)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| GITHUB_API.to_string());
        Self::with_api(token, &api)
    }

    /// Create a handle against an explicit API base URL.
    pub fn with_api(token: &str, api: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("openv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::remote("build http client", None, e.to_string()))?;

        Ok(Self {
            client,
            api: api.trim_end_matches('/').to_string(),
            token: Zeroizing::new(token.to_string()),
        })
    }

    /// Base URL requests are sent to.
    pub fn api(&self) -> &str {
        &self.api
    }

    /// Join `segments` onto the API base, percent-encoding each one.
    fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        let invalid = |reason: String| SyncError::remote("build request url", None, reason);

        let mut url = Url::parse(&self.api).map_err(|e| invalid(format!("{}: {}", self.api, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot be a base URL", self.api)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send<S: AsRef<str>>(
        &self,
        operation: &str,
        method: Method,
        path: &[S],
        body: Option<&Value>,
    ) -> Result<Response> {
        let url = self.url(path)?;
        debug!(%method, path = url.path(), "github request");

        let builder = self
            .client
            .request(method, url)
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, GITHUB_API_VERSION);

        let builder = match body {
            Some(payload) => builder.json(payload),
            None => builder,
        };

        builder
            .send()
            .map_err(|e| SyncError::remote(operation, None, e.to_string()).into())
    }

    fn repository_id(&self, owner: &str, repo: &str) -> Result<u64> {
        #[derive(Deserialize)]
        struct Repository {
            id: u64,
        }

        let operation = format!("look up repository {}/{}", owner, repo);
        let response = self.send(&operation, Method::GET, &["repos", owner, repo], None)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::ScopeResolution(format!(
                "repository {}/{} not found or not accessible",
                owner, repo
            ))
            .into());
        }

        let repository: Repository = decode(&operation, success(&operation, response)?)?;
        debug!(owner, repo, id = repository.id, "resolved repository");
        Ok(repository.id)
    }
}

impl Platform for GitHub {
    fn scope_client(&self, scope: &Scope) -> Result<Box<dyn ScopeClient + '_>> {
        let location = match scope {
            Scope::Organization { org } => Location::Organization { org: org.clone() },
            Scope::Repository { owner, repo } => Location::Repository {
                owner: owner.clone(),
                repo: repo.clone(),
            },
            Scope::RepositoryEnvironment {
                owner,
                repo,
                environment,
            } => Location::Environment {
                owner: owner.clone(),
                repo: repo.clone(),
                repo_id: self.repository_id(owner, repo)?,
                environment: environment.clone(),
            },
        };

        Ok(Box::new(GitHubScope {
            github: self,
            scope: scope.clone(),
            location,
        }))
    }
}

/// Resolved API coordinates of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Organization {
        org: String,
    },
    Repository {
        owner: String,
        repo: String,
    },
    Environment {
        owner: String,
        repo: String,
        repo_id: u64,
        environment: String,
    },
}

impl Location {
    fn secrets(&self) -> Vec<String> {
        match self {
            Self::Organization { org } => path(&["orgs", org.as_str(), "actions", "secrets"]),
            Self::Repository { owner, repo } => path(&[
                "repos",
                owner.as_str(),
                repo.as_str(),
                "actions",
                "secrets",
            ]),
            Self::Environment {
                repo_id,
                environment,
                ..
            } => path(&[
                "repositories",
                repo_id.to_string().as_str(),
                "environments",
                environment.as_str(),
                "secrets",
            ]),
        }
    }

    fn variables(&self) -> Vec<String> {
        match self {
            Self::Organization { org } => path(&["orgs", org.as_str(), "actions", "variables"]),
            Self::Repository { owner, repo } => path(&[
                "repos",
                owner.as_str(),
                repo.as_str(),
                "actions",
                "variables",
            ]),
            Self::Environment {
                owner,
                repo,
                environment,
                ..
            } => path(&[
                "repos",
                owner.as_str(),
                repo.as_str(),
                "environments",
                environment.as_str(),
                "variables",
            ]),
        }
    }

    fn secret(&self, name: &str) -> Vec<String> {
        let mut path = self.secrets();
        path.push(name.to_string());
        path
    }

    fn variable(&self, name: &str) -> Vec<String> {
        let mut path = self.variables();
        path.push(name.to_string());
        path
    }

    fn public_key(&self) -> Vec<String> {
        let mut path = self.secrets();
        path.push("public-key".to_string());
        path
    }

    fn is_organization(&self) -> bool {
        matches!(self, Self::Organization { .. })
    }
}

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|segment| segment.to_string()).collect()
}

/// Body for creating a variable. Organization variables need a visibility.
fn create_variable_body(location: &Location, name: &str, value: &str) -> Value {
    let mut body = json!({ "name": name, "value": value });
    if location.is_organization() {
        body["visibility"] = json!(DEFAULT_VISIBILITY);
    }
    body
}

/// Body for updating a variable. Visibility is left as it is.
fn update_variable_body(name: &str, value: &str) -> Value {
    json!({ "name": name, "value": value })
}

/// Body for a secret write. `visibility` is only sent for organizations.
fn secret_body(secret: &SealedSecret, visibility: Option<&str>) -> Value {
    let mut body = json!({
        "encrypted_value": secret.encrypted_value,
        "key_id": secret.key_id,
    });
    if let Some(visibility) = visibility {
        body["visibility"] = json!(visibility);
    }
    body
}

struct GitHubScope<'a> {
    github: &'a GitHub,
    scope: Scope,
    location: Location,
}

impl GitHubScope<'_> {
    fn call(
        &self,
        operation: &str,
        method: Method,
        path: &[String],
        body: Option<&Value>,
    ) -> Result<Response> {
        let response = self.github.send(operation, method, path, body)?;
        success(operation, response)
    }

    /// Current visibility of an organization secret, or the default if the
    /// secret does not exist yet.
    fn secret_visibility(&self, name: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct OrgSecret {
            visibility: String,
        }

        let operation = format!("get secret {}", name);
        let response = self.github.send(
            &operation,
            Method::GET,
            &self.location.secret(name),
            None,
        )?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DEFAULT_VISIBILITY.to_string());
        }

        let secret: OrgSecret = decode(&operation, success(&operation, response)?)?;
        Ok(secret.visibility)
    }
}

impl ScopeClient for GitHubScope<'_> {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn public_key(&self) -> Result<PublicKeyMaterial> {
        let operation = format!("get public key for {}", self.scope);
        let response = self.call(&operation, Method::GET, &self.location.public_key(), None)?;
        decode(&operation, response)
    }

    fn get_variable(&self, name: &str) -> Result<Option<String>> {
        #[derive(Deserialize)]
        struct Variable {
            value: String,
        }

        let operation = format!("get variable {}", name);
        let response = self.github.send(
            &operation,
            Method::GET,
            &self.location.variable(name),
            None,
        )?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let variable: Variable = decode(&operation, success(&operation, response)?)?;
        Ok(Some(variable.value))
    }

    fn create_variable(&self, name: &str, value: &str) -> Result<()> {
        let body = create_variable_body(&self.location, name, value);
        self.call(
            &format!("create variable {}", name),
            Method::POST,
            &self.location.variables(),
            Some(&body),
        )?;
        Ok(())
    }

    fn update_variable(&self, name: &str, value: &str) -> Result<()> {
        let body = update_variable_body(name, value);
        self.call(
            &format!("update variable {}", name),
            Method::PATCH,
            &self.location.variable(name),
            Some(&body),
        )?;
        Ok(())
    }

    fn delete_variable(&self, name: &str) -> Result<()> {
        self.call(
            &format!("delete variable {}", name),
            Method::DELETE,
            &self.location.variable(name),
            None,
        )?;
        Ok(())
    }

    fn put_secret(&self, name: &str, secret: &SealedSecret) -> Result<Written> {
        let visibility = if self.location.is_organization() {
            Some(self.secret_visibility(name)?)
        } else {
            None
        };
        let body = secret_body(secret, visibility.as_deref());
        let response = self.call(
            &format!("put secret {}", name),
            Method::PUT,
            &self.location.secret(name),
            Some(&body),
        )?;

        Ok(match response.status() {
            StatusCode::CREATED => Written::Created,
            _ => Written::Updated,
        })
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        let operation = format!("delete secret {}", name);
        let response = self.github.send(
            &operation,
            Method::DELETE,
            &self.location.secret(name),
            None,
        )?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(name, "secret already absent");
            return Ok(());
        }

        success(&operation, response)?;
        Ok(())
    }
}

/// Turn a non-2xx response into `SyncError::RemoteApi`.
fn success(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(SyncError::remote(operation, Some(status.as_u16()), error_message(status, &body)).into())
}

fn decode<T: serde::de::DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let status = response.status().as_u16();
    response.json::<T>().map_err(|e| {
        SyncError::remote(operation, Some(status), format!("unexpected response: {}", e)).into()
    })
}

/// Extract GitHub's `message` field, falling back to the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }

    if let Ok(err) = serde_json::from_str::<ApiError>(body) {
        return err.message;
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
