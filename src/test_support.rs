// Copyright 2025 Cowboy AI, LLC.

//! Fixtures shared by the unit tests

use std::sync::{Arc, Mutex};

use crate::connectable::{Connectable, Connector};
use crate::errors::ConnectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    id: String,
    pub(crate) label: &'static str,
}

impl Connectable for Node {
    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn node(id: &str) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        label: "",
    })
}

pub(crate) fn labelled(id: &str, label: &'static str) -> Arc<Node> {
    Arc::new(Node {
        id: id.to_string(),
        label,
    })
}

/// Connector that records every connection and can be told to fail on one
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    id: String,
    fail_on: Option<(String, String)>,
    log: Mutex<Vec<String>>,
}

impl Recorder {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_on(id: &str, source: &str, sink: &str) -> Self {
        Self {
            id: id.to_string(),
            fail_on: Some((source.to_string(), sink.to_string())),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl Connector for Recorder {
    type Entity = Node;

    fn id(&self) -> &str {
        &self.id
    }

    fn connect(&self, source: &Node, sink: &Node) -> Result<(), ConnectorError> {
        if let Some((s, t)) = &self.fail_on {
            if s == source.id() && t == sink.id() {
                return Err(format!("refused {s} -> {t}").into());
            }
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("{} -> {}", source.id(), sink.id()));
        Ok(())
    }
}
