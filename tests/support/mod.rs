// Copyright 2025 Cowboy AI, LLC.

//! Shared fixtures for integration tests.
//! Keep this file pure; connectors only record what they were asked to do.

use std::sync::{Arc, Mutex};

use cim_equation::{Connectable, Connector, ConnectorError, EquationFactory, EquationTerm};

/// A named port on some component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    name: String,
}

impl Port {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Connectable for Port {
    fn id(&self) -> &str {
        &self.name
    }
}

/// Shared log of `source -> sink` lines.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl Trace {
    /// Drain the recorded lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Connector recording every connection into a [`Trace`].
#[allow(dead_code)]
pub struct TraceConnector {
    id: String,
    trace: Trace,
}

impl Connector for TraceConnector {
    type Entity = Port;

    fn id(&self) -> &str {
        &self.id
    }

    fn connect(&self, source: &Port, sink: &Port) -> Result<(), ConnectorError> {
        self.trace
            .0
            .lock()
            .unwrap()
            .push(format!("{} -> {}", source.id(), sink.id()));
        Ok(())
    }
}

/// Factory for one equation plus the trace its connector writes to.
#[allow(dead_code)]
pub fn equation(connector_id: &str) -> (EquationFactory<TraceConnector>, Trace) {
    let trace = Trace::default();
    let factory = EquationFactory::new(TraceConnector {
        id: connector_id.to_string(),
        trace: trace.clone(),
    });
    (factory, trace)
}

/// Wrap each name into a term.
#[allow(dead_code)]
pub fn wrap_all<const N: usize>(
    g: &EquationFactory<TraceConnector>,
    names: [&str; N],
) -> [EquationTerm<TraceConnector>; N] {
    names.map(|name| g.w(Port::new(name)))
}

/// Planned links of a term in canonical order.
#[allow(dead_code)]
pub fn sorted_links(term: &EquationTerm<TraceConnector>) -> Vec<String> {
    use cim_equation::Category;

    term.links()
        .to_sorted_vec()
        .iter()
        .map(|link| link.to_string())
        .collect()
}
