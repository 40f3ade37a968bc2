// Shared helpers for integration tests.
//
// Provides in-process stand-ins for the three outside dependencies of the
// desktop utilities: external programs, the `pass` store and the temporary
// mail provider. Each records what it was asked to do so tests can assert
// on the interaction without touching the real desktop.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use deskutil_cli::error::{MailError, StoreError};
use deskutil_cli::exec::{ExecResult, Executor};
use deskutil_cli::store::CredentialStore;
use deskutil_cli::tempmail::{Address, MailApi, Message, MessageSummary};

/// One recorded program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub input: Option<String>,
}

/// [`Executor`] that records calls and answers from a FIFO queue.
///
/// `spawn` hands out increasing PIDs that are considered alive until a
/// plain `kill <pid>` is recorded; `kill -0` probes that set.
#[derive(Debug)]
pub struct RecordingExecutor {
    programs: HashSet<String>,
    replies: Mutex<VecDeque<(bool, String)>>,
    calls: Mutex<Vec<Invocation>>,
    alive: Mutex<HashSet<u32>>,
    next_pid: Mutex<u32>,
}

impl RecordingExecutor {
    /// Executor where only `programs` are installed.
    pub fn with_programs(programs: &[&str]) -> Self {
        Self {
            programs: programs.iter().map(|p| (*p).to_string()).collect(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            alive: Mutex::new(HashSet::new()),
            next_pid: Mutex::new(1000),
        }
    }

    /// Queue a successful reply printing `stdout`.
    pub fn reply(self, stdout: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back((true, stdout.to_string()));
        self
    }

    /// Queue a failing reply, e.g. a dismissed menu.
    pub fn reply_failure(self) -> Self {
        self.replies.lock().unwrap().push_back((false, String::new()));
        self
    }

    /// Every call, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made to `program`.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }

    /// Stdin payloads sent to `program`.
    pub fn inputs_to(&self, program: &str) -> Vec<String> {
        self.calls_to(program)
            .into_iter()
            .filter_map(|c| c.input)
            .collect()
    }

    /// PIDs currently considered alive.
    pub fn alive(&self) -> HashSet<u32> {
        self.alive.lock().unwrap().clone()
    }

    fn record(&self, program: &str, args: &[&str], input: Option<&str>) -> ExecResult {
        self.calls.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            input: input.map(String::from),
        });
        let (success, stdout) = if program == "kill" {
            (self.kill(args), String::new())
        } else {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((true, String::new()))
        };
        ExecResult {
            stdout,
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        }
    }

    fn kill(&self, args: &[&str]) -> bool {
        let Some(pid) = args.last().and_then(|p| p.parse::<u32>().ok()) else {
            return false;
        };
        let mut alive = self.alive.lock().unwrap();
        if args.first() == Some(&"-0") {
            alive.contains(&pid)
        } else {
            alive.remove(&pid)
        }
    }

    fn checked(result: ExecResult, program: &str) -> anyhow::Result<ExecResult> {
        if result.success {
            Ok(result)
        } else {
            Err(anyhow::anyhow!("{program} failed"))
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Self::checked(self.record(program, args, None), program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args, None))
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> anyhow::Result<ExecResult> {
        Self::checked(self.record(program, args, Some(input)), program)
    }

    fn run_unchecked_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> anyhow::Result<ExecResult> {
        Ok(self.record(program, args, Some(input)))
    }

    fn spawn(&self, program: &str, args: &[&str]) -> anyhow::Result<u32> {
        self.record(program, args, None);
        let mut next = self.next_pid.lock().unwrap();
        let pid = *next;
        *next += 1;
        self.alive.lock().unwrap().insert(pid);
        Ok(pid)
    }

    fn which(&self, program: &str) -> bool {
        self.programs.contains(program)
    }
}

/// Plaintext credential store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (path, content) in entries {
            store.insert(path, content).unwrap();
        }
        store
    }
}

impl CredentialStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }

    fn show(&self, path: &str) -> Result<String, StoreError> {
        self.entries
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::Show {
                path: path.to_string(),
                reason: "is not in the password store".to_string(),
            })
    }

    fn insert(&self, path: &str, content: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::Remove {
                path: path.to_string(),
                reason: "is not in the password store".to_string(),
            })
    }
}

/// In-memory mail provider. Accounts are keyed by address; the bearer
/// token is the address itself.
#[derive(Debug, Default)]
pub struct FakeMail {
    domains: Vec<String>,
    accounts: Mutex<BTreeMap<String, (String, String)>>,
    inbox: Mutex<BTreeMap<String, Vec<Message>>>,
    deleted: Mutex<Vec<String>>,
}

impl FakeMail {
    pub fn with_domains(domains: &[&str]) -> Self {
        Self {
            domains: domains.iter().map(|d| (*d).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Deliver a message to `address`.
    pub fn deliver(&self, address: &str, from: &str, subject: &str, text: &str) {
        let mut inbox = self.inbox.lock().unwrap();
        let messages = inbox.entry(address.to_string()).or_default();
        messages.push(Message {
            id: format!("msg-{}", messages.len() + 1),
            from: Address {
                address: from.to_string(),
                name: String::new(),
            },
            subject: subject.to_string(),
            text: text.to_string(),
        });
    }

    /// Addresses with an account.
    pub fn addresses(&self) -> Vec<String> {
        self.accounts.lock().unwrap().keys().cloned().collect()
    }

    /// Account ids deleted so far.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

impl MailApi for FakeMail {
    fn domains(&self) -> Result<Vec<String>, MailError> {
        Ok(self.domains.clone())
    }

    fn create_account(&self, address: &str, password: &str) -> Result<String, MailError> {
        let mut accounts = self.accounts.lock().unwrap();
        let id = format!("acct-{}", accounts.len() + 1);
        accounts.insert(address.to_string(), (password.to_string(), id.clone()));
        Ok(id)
    }

    fn token(&self, address: &str, password: &str) -> Result<String, MailError> {
        match self.accounts.lock().unwrap().get(address) {
            Some((stored, _)) if stored == password => Ok(address.to_string()),
            _ => Err(MailError::Request {
                url: "/token".to_string(),
                reason: "http status: 401".to_string(),
            }),
        }
    }

    fn messages(&self, token: &str) -> Result<Vec<MessageSummary>, MailError> {
        let inbox = self.inbox.lock().unwrap();
        Ok(inbox
            .get(token)
            .map(|messages| {
                messages
                    .iter()
                    .map(|m| MessageSummary {
                        id: m.id.clone(),
                        from: m.from.clone(),
                        subject: m.subject.clone(),
                        intro: m.text.chars().take(20).collect(),
                        seen: false,
                        created_at: String::new(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn message(&self, token: &str, id: &str) -> Result<Message, MailError> {
        self.inbox
            .lock()
            .unwrap()
            .get(token)
            .and_then(|messages| messages.iter().find(|m| m.id == id).cloned())
            .ok_or_else(|| MailError::Request {
                url: format!("/messages/{id}"),
                reason: "http status: 404".to_string(),
            })
    }

    fn delete_account(&self, token: &str, id: &str) -> Result<(), MailError> {
        self.accounts.lock().unwrap().remove(token);
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

/// Write `content` to a `config.toml` inside `dir` and return its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("write config file");
    path
}
