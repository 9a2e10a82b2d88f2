//! Contract boundary: the read and write facilities the core consumes
//!
//! The smart contract and the wallet connector live outside this crate.
//! Reads come back as raw JSON in one of three states; writes are handed
//! off and never awaited.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;

use crate::config::DappConfig;
use crate::wallet::Address;

// ── Reads ─────────────────────────────────────────────────

/// A view function call on one of the two contracts
#[derive(Debug, Clone, PartialEq)]
pub enum ReadCall {
    /// `getAllCampaigns()` on the crowdfunding contract
    AllCampaigns,
    /// `campaigns(id)` on the crowdfunding contract
    Campaign { id: u64 },
    /// `getTotalCampaigns()` on the crowdfunding contract
    TotalCampaigns,
    /// `allowance(owner, spender)` on the token contract
    Allowance { owner: Address, spender: Address },
}

impl ReadCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            ReadCall::AllCampaigns => "getAllCampaigns",
            ReadCall::Campaign { .. } => "campaigns",
            ReadCall::TotalCampaigns => "getTotalCampaigns",
            ReadCall::Allowance { .. } => "allowance",
        }
    }

    pub fn args(&self) -> Vec<Value> {
        match self {
            ReadCall::AllCampaigns | ReadCall::TotalCampaigns => Vec::new(),
            ReadCall::Campaign { id } => vec![Value::from(*id)],
            ReadCall::Allowance { owner, spender } => vec![
                Value::String(owner.to_string()),
                Value::String(spender.to_string()),
            ],
        }
    }

    /// Contract the call is addressed to
    pub fn target<'a>(&self, config: &'a DappConfig) -> &'a Address {
        match self {
            ReadCall::Allowance { .. } => &config.token_address,
            _ => &config.crowdfunding_address,
        }
    }
}

/// Progress of an outstanding read
#[derive(Debug, Clone, PartialEq)]
pub enum ReadState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> ReadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReadState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ReadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadState<U> {
        match self {
            ReadState::Pending => ReadState::Pending,
            ReadState::Ready(value) => ReadState::Ready(f(value)),
            ReadState::Failed(message) => ReadState::Failed(message),
        }
    }
}

/// Source of contract reads
pub trait ContractReader {
    fn read(&self, call: &ReadCall) -> ReadState<Value>;
}

/// Reader answering from a fixed table of responses.
///
/// Calls with no registered response fail.
#[derive(Debug, Clone, Default)]
pub struct StaticReader {
    responses: Vec<(ReadCall, ReadState<Value>)>,
}

impl StaticReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, call: ReadCall, state: ReadState<Value>) -> Self {
        self.responses.retain(|(c, _)| c != &call);
        self.responses.push((call, state));
        self
    }
}

impl ContractReader for StaticReader {
    fn read(&self, call: &ReadCall) -> ReadState<Value> {
        self.responses
            .iter()
            .find(|(c, _)| c == call)
            .map(|(_, state)| state.clone())
            .unwrap_or_else(|| {
                ReadState::Failed(format!("no response for {}", call.function_name()))
            })
    }
}

// ── Writes ────────────────────────────────────────────────

/// State-changing contract functions the UI submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteFunction {
    /// `launch(title, description, category, goal, startAt, endAt)`
    Launch,
    /// `pledge(id, amount)`
    Pledge,
    /// ERC-20 `approve(spender, amount)`
    Approve,
}

impl WriteFunction {
    pub fn name(self) -> &'static str {
        match self {
            WriteFunction::Launch => "launch",
            WriteFunction::Pledge => "pledge",
            WriteFunction::Approve => "approve",
        }
    }
}

/// A transaction ready for the wallet: target, function and ordered args.
///
/// Wei amounts are carried as decimal strings, ids and seconds as numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteCall {
    pub contract: Address,
    pub function: WriteFunction,
    pub args: Vec<Value>,
}

/// Sink for transactions. Fire-and-forget: nothing is returned or awaited.
pub trait ContractWriter {
    fn submit(&self, call: WriteCall);
}

/// A submitted call, numbered in submission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteLogEntry {
    pub sequence: u64,
    pub call: WriteCall,
}

/// Append-only in-memory writer that records every submission
#[derive(Debug, Default)]
pub struct WriteLog {
    entries: RefCell<Vec<WriteLogEntry>>,
}

impl WriteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<WriteLogEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ContractWriter for WriteLog {
    fn submit(&self, call: WriteCall) {
        let mut entries = self.entries.borrow_mut();
        let sequence = entries.len() as u64;
        tracing::info!(
            sequence,
            function = call.function.name(),
            contract = %call.contract,
            "transaction submitted"
        );
        entries.push(WriteLogEntry { sequence, call });
    }
}
