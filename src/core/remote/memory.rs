//! In-memory platform.
//!
//! Stores secrets and variables in process and records every call in
//! order. Failures can be injected per name to exercise error paths.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;

use super::{Platform, ScopeClient, Written};
use crate::core::cipher::{PublicKeyMaterial, SealedSecret};
use crate::core::domain::Scope;
use crate::error::{Result, SyncError};

/// One recorded call against a [`Memory`] scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PublicKey,
    GetVariable(String),
    CreateVariable(String),
    UpdateVariable(String),
    DeleteVariable(String),
    PutSecret(String),
    DeleteSecret(String),
}

impl Call {
    /// Whether the call changes remote state.
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::PublicKey | Self::GetVariable(_))
    }
}

#[derive(Default)]
struct State {
    secrets: BTreeMap<String, SealedSecret>,
    variables: BTreeMap<String, String>,
    calls: Vec<Call>,
}

/// In-memory scope with a real sealing key pair.
pub struct Memory {
    scope: Scope,
    secret_key: SecretKey,
    key_id: String,
    state: RefCell<State>,
    failing_reads: HashSet<String>,
    failing_puts: HashSet<String>,
    failing_deletes: HashSet<String>,
    no_public_key: bool,
    public_key_override: Option<String>,
}

impl Memory {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            secret_key: SecretKey::generate(&mut OsRng),
            key_id: "memory-key".to_string(),
            state: RefCell::new(State::default()),
            failing_reads: HashSet::new(),
            failing_puts: HashSet::new(),
            failing_deletes: HashSet::new(),
            no_public_key: false,
            public_key_override: None,
        }
    }

    /// Preset a variable.
    pub fn with_variable(self, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .variables
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Preset a secret with an opaque value.
    pub fn with_secret(self, name: &str) -> Self {
        let sealed = SealedSecret {
            encrypted_value: String::new(),
            key_id: self.key_id.clone(),
        };
        self.state
            .borrow_mut()
            .secrets
            .insert(name.to_string(), sealed);
        self
    }

    /// Make reads of variable `name` fail.
    pub fn fail_read(mut self, name: &str) -> Self {
        self.failing_reads.insert(name.to_string());
        self
    }

    /// Make writes of secret `name` fail.
    pub fn fail_put(mut self, name: &str) -> Self {
        self.failing_puts.insert(name.to_string());
        self
    }

    /// Make deletion of secret or variable `name` fail.
    pub fn fail_delete(mut self, name: &str) -> Self {
        self.failing_deletes.insert(name.to_string());
        self
    }

    /// Make public key retrieval fail.
    pub fn without_public_key(mut self) -> Self {
        self.no_public_key = true;
        self
    }

    /// Hand out `key` instead of the real public key.
    pub fn with_public_key(mut self, key: &str) -> Self {
        self.public_key_override = Some(key.to_string());
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Recorded calls that changed state.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    /// Forget recorded calls, keeping stored data.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Names of stored secrets, sorted.
    pub fn secret_names(&self) -> Vec<String> {
        self.state.borrow().secrets.keys().cloned().collect()
    }

    /// Stored variable value.
    pub fn variable(&self, name: &str) -> Option<String> {
        self.state.borrow().variables.get(name).cloned()
    }

    /// Decrypt a stored secret with this scope's private key.
    pub fn open_secret(&self, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let sealed = state.secrets.get(name)?;
        let raw = STANDARD.decode(&sealed.encrypted_value).ok()?;
        let plain = self.secret_key.unseal(&raw).ok()?;
        String::from_utf8(plain).ok()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn injected(operation: &str, name: &str) -> crate::error::Error {
        SyncError::remote(format!("{} {}", operation, name), Some(500), "injected failure").into()
    }
}

impl ScopeClient for Memory {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    fn public_key(&self) -> Result<PublicKeyMaterial> {
        self.record(Call::PublicKey);
        if self.no_public_key {
            return Err(
                SyncError::remote("get public key", Some(403), "Resource not accessible").into(),
            );
        }
        let key = self
            .public_key_override
            .clone()
            .unwrap_or_else(|| STANDARD.encode(self.secret_key.public_key().as_bytes()));
        Ok(PublicKeyMaterial::new(key, self.key_id.clone()))
    }

    fn get_variable(&self, name: &str) -> Result<Option<String>> {
        self.record(Call::GetVariable(name.to_string()));
        if self.failing_reads.contains(name) {
            return Err(Self::injected("get variable", name));
        }
        Ok(self.variable(name))
    }

    fn create_variable(&self, name: &str, value: &str) -> Result<()> {
        self.record(Call::CreateVariable(name.to_string()));
        let mut state = self.state.borrow_mut();
        if state.variables.contains_key(name) {
            return Err(SyncError::remote(
                format!("create variable {}", name),
                Some(409),
                "Already exists",
            )
            .into());
        }
        state.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn update_variable(&self, name: &str, value: &str) -> Result<()> {
        self.record(Call::UpdateVariable(name.to_string()));
        let mut state = self.state.borrow_mut();
        match state.variables.get_mut(name) {
            Some(existing) => {
                *existing = value.to_string();
                Ok(())
            }
            None => Err(SyncError::remote(
                format!("update variable {}", name),
                Some(404),
                "Not Found",
            )
            .into()),
        }
    }

    fn delete_variable(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteVariable(name.to_string()));
        if self.failing_deletes.contains(name) {
            return Err(Self::injected("delete variable", name));
        }
        self.state.borrow_mut().variables.remove(name);
        Ok(())
    }

    fn put_secret(&self, name: &str, secret: &SealedSecret) -> Result<Written> {
        self.record(Call::PutSecret(name.to_string()));
        if self.failing_puts.contains(name) {
            return Err(Self::injected("put secret", name));
        }
        let previous = self
            .state
            .borrow_mut()
            .secrets
            .insert(name.to_string(), secret.clone());
        Ok(if previous.is_some() {
            Written::Updated
        } else {
            Written::Created
        })
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteSecret(name.to_string()));
        if self.failing_deletes.contains(name) {
            return Err(Self::injected("delete secret", name));
        }
        self.state.borrow_mut().secrets.remove(name);
        Ok(())
    }
}

/// A set of [`Memory`] scopes. Unknown scopes fail to resolve.
#[derive(Default)]
pub struct MemoryPlatform {
    scopes: Vec<Memory>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scope.
    pub fn with(mut self, memory: Memory) -> Self {
        self.scopes.push(memory);
        self
    }

    /// The registered scope, for inspection.
    pub fn scope(&self, scope: &Scope) -> Option<&Memory> {
        self.scopes.iter().find(|m| m.scope() == scope)
    }
}

impl Platform for MemoryPlatform {
    fn scope_client(&self, scope: &Scope) -> Result<Box<dyn ScopeClient + '_>> {
        let memory = self
            .scope(scope)
            .ok_or_else(|| SyncError::ScopeResolution(format!("{} not found", scope)))?;
        Ok(Box::new(memory))
    }
}
