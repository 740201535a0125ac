//! 1Password source.
//!
//! Drives the `op` CLI with a service account token. Environments are
//! Secure Notes titled `.env.<owner>.<repo>`, tagged `env:<name>`, with a
//! `url` metadata field and one concealed field per variable in the
//! `variables` section.
//!
//! ## Requirements
//!
//! - `op` 2.x on `PATH`
//! - A service account token with read access to the vault (write access
//!   for `openv import`)

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Environment, Locator, Source};
use crate::core::constants::ENV_OP_TOKEN;
use crate::error::{Error, Result, SourceError};

const METADATA_SECTION: &str = "metadata";
const VARIABLES_SECTION: &str = "variables";
const URL_FIELD: &str = "url";
const INACTIVE_ITEM: &str = "not in an active state";

#[derive(Debug, Deserialize)]
struct VaultInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ItemSummary {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    fields: Vec<Field>,
}

#[derive(Debug, Deserialize)]
struct Field {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    section: Option<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    id: String,
}

impl Item {
    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    fn url(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.id == URL_FIELD)
            .and_then(|f| f.value.as_deref())
    }

    fn variables(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|f| f.section.as_ref().is_some_and(|s| s.id == VARIABLES_SECTION))
            .map(|f| (f.label.clone(), f.value.clone().unwrap_or_default()))
            .collect()
    }

    /// Whether this item holds the environment `locator` points at.
    fn matches(&self, locator: &Locator) -> bool {
        self.has_tag(&env_tag(&locator.environment)) && self.url() == Some(locator.base_name())
    }
}

fn env_tag(environment: &str) -> String {
    format!("env:{}", environment)
}

/// What to store with `openv import`.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub locator: Locator,
    pub variables: BTreeMap<String, String>,
    /// Profile names recorded in the item metadata
    pub sync_profiles: Vec<String>,
}

/// 1Password vault accessed through the `op` CLI.
pub struct OnePassword {
    binary: PathBuf,
    token: Zeroizing<String>,
    vault: String,
}

impl OnePassword {
    /// # Errors
    ///
    /// Returns `SourceError::CliMissing` if `op` is not on `PATH`.
    pub fn new(token: &str, vault: &str) -> Result<Self> {
        let binary = which::which("op").map_err(|_| SourceError::CliMissing)?;
        debug!(binary = %binary.display(), vault, "using 1Password CLI");

        Ok(Self {
            binary,
            token: Zeroizing::new(token.to_string()),
            vault: vault.to_string(),
        })
    }

    /// Store the variables from `request` as a Secure Note.
    ///
    /// An existing item with the same title and environment tag is
    /// replaced in place. Returns the item id.
    pub fn import(&self, request: &ImportRequest) -> Result<String> {
        let vault_id = self.vault_id()?;
        let name = request.locator.item_name()?;
        let template = Zeroizing::new(
            serde_json::to_vec(&item_template(request, &name))
                .map_err(|e| SourceError::Decode(e.to_string()))?,
        );

        let tag = env_tag(&request.locator.environment);
        let existing = self.find_item(
            &vault_id,
            &request.locator.environment,
            |summary| summary.title.to_lowercase() == name,
            |item| item.has_tag(&tag),
        )?;

        let output = match existing {
            Some(item) => {
                debug!(item = %item.id, "replacing existing item");
                self.op(
                    &["item", "edit", &item.id, "--vault", &vault_id, "--format", "json"],
                    Some(template.as_slice()),
                )?
            }
            None => {
                debug!(name = %name, "creating item");
                self.op(
                    &["item", "create", "--vault", &vault_id, "--format", "json"],
                    Some(template.as_slice()),
                )?
            }
        };

        let created: ItemSummary = parse(&output)?;
        Ok(created.id)
    }

    fn vault_id(&self) -> Result<String> {
        let output = self
            .op(&["vault", "get", &self.vault, "--format", "json"], None)
            .map_err(|_| SourceError::VaultNotFound(self.vault.clone()))?;
        let vault: VaultInfo = parse(&output)?;
        Ok(vault.id)
    }

    /// First active item tagged for `environment` whose summary passes
    /// `select` and whose details pass `accept`.
    fn find_item(
        &self,
        vault_id: &str,
        environment: &str,
        select: impl Fn(&ItemSummary) -> bool,
        accept: impl Fn(&Item) -> bool,
    ) -> Result<Option<Item>> {
        let tag = env_tag(environment);
        let output = self.op(
            &["item", "list", "--vault", vault_id, "--tags", &tag, "--format", "json"],
            None,
        )?;
        let summaries: Vec<ItemSummary> = parse(&output)?;
        trace!(count = summaries.len(), "listed items");

        for summary in summaries.iter().filter(|s| select(s)) {
            let item: Item = match self.op(
                &["item", "get", &summary.id, "--vault", vault_id, "--format", "json"],
                None,
            ) {
                Ok(output) => parse(&output)?,
                Err(Error::Source(SourceError::CliFailed(msg))) if msg.contains(INACTIVE_ITEM) => {
                    trace!(item = %summary.id, "skipping inactive item");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if accept(&item) {
                return Ok(Some(item));
            }
        }

        Ok(None)
    }

    fn op(&self, args: &[&str], stdin: Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>> {
        let command = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        debug!(%command, "running op");

        let mut child = Command::new(&self.binary)
            .args(args)
            .env(ENV_OP_TOKEN, self.token.as_str())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::CliFailed(format!("failed to spawn op: {}", e)))?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input)
                .map_err(|e| SourceError::CliFailed(format!("failed to write to op: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SourceError::CliFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::CliFailed(stderr.trim().to_string()).into());
        }

        Ok(Zeroizing::new(output.stdout))
    }
}

impl Source for OnePassword {
    fn fetch_environment(&self, locator: &Locator) -> Result<Environment> {
        let vault_id = self.vault_id()?;
        debug!(url = locator.base_name(), env = %locator.environment, "fetching environment");

        let item = self
            .find_item(&vault_id, &locator.environment, |_| true, |item| {
                item.matches(locator)
            })?
            .ok_or_else(|| SourceError::NotFound {
                url: locator.base_name().to_string(),
                env: locator.environment.clone(),
            })?;

        debug!(item = %item.id, "found environment");
        Ok(Environment {
            variables: item.variables(),
            item_id: item.id,
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(output: &[u8]) -> Result<T> {
    serde_json::from_slice(output).map_err(|e| SourceError::Decode(e.to_string()).into())
}

/// JSON item template piped to `op item create` / `op item edit`.
fn item_template(request: &ImportRequest, name: &str) -> Value {
    let locator = &request.locator;
    let url = locator.base_name();
    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut fields = vec![
        json!({
            "id": "notesPlain",
            "type": "STRING",
            "purpose": "NOTES",
            "label": "notesPlain",
            "value": format!("{} - {}\nDate: {}\n", url, locator.environment, date),
        }),
        json!({
            "id": "env",
            "type": "STRING",
            "label": "Environment",
            "value": locator.environment,
            "section": { "id": METADATA_SECTION },
        }),
        json!({
            "id": URL_FIELD,
            "type": "STRING",
            "label": "URL",
            "value": url,
            "section": { "id": METADATA_SECTION },
        }),
    ];

    if !request.sync_profiles.is_empty() {
        fields.push(json!({
            "id": "sync_profiles",
            "type": "STRING",
            "label": "Sync Profiles",
            "value": request.sync_profiles.join(","),
            "section": { "id": METADATA_SECTION },
        }));
    }

    for (key, value) in &request.variables {
        fields.push(json!({
            "id": key,
            "type": "CONCEALED",
            "label": key,
            "value": value,
            "section": { "id": VARIABLES_SECTION },
        }));
    }

    json!({
        "title": name,
        "category": "SECURE_NOTE",
        "tags": ["autogenerated", ".env", env_tag(&locator.environment)],
        "sections": [
            { "id": METADATA_SECTION, "label": "Metadata" },
            { "id": VARIABLES_SECTION, "label": "Environment Variables" },
        ],
        "fields": fields,
    })
}
