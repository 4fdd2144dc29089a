//! Host lifecycle integration.
//!
//! The deploy host calls into the plugin at two named hook points: once when a
//! full service deployment initializes and once before a single function is
//! deployed. Both run the same selection, differing only in whether a single
//! function is targeted.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::registry::UnitRegistry;
use crate::selection::{SelectionError, SelectionReport, apply_selection};
use crate::types::SelectionRequest;

/// Lifecycle events the plugin attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Full service deployment is initializing.
    DeployInitialize,
    /// A single function deployment is about to initialize.
    DeployFunctionInitialize,
}

impl HookPoint {
    pub const ALL: [HookPoint; 2] = [
        HookPoint::DeployInitialize,
        HookPoint::DeployFunctionInitialize,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HookPoint::DeployInitialize => "after:deploy:initialize",
            HookPoint::DeployFunctionInitialize => "before:deploy:function:initialize",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|point| point.key() == key)
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HookPoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| anyhow::anyhow!("Unknown hook point: {}", s))
    }
}

/// Options of the current deploy run, as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub region: Option<String>,
    pub stage: Option<String>,
    pub function: Option<String>,
    /// Skip function selection for this run entirely.
    pub no_deploy: bool,
}

impl RunOptions {
    fn request(&self, function: Option<String>) -> SelectionRequest {
        SelectionRequest {
            region: self.region.clone(),
            stage: self.stage.clone(),
            function,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Selection was bypassed; the registry was not read.
    Skipped,
    Applied(SelectionReport),
}

/// Selection plugin bound to one deploy run.
#[derive(Debug, Clone)]
pub struct SelectPlugin {
    options: RunOptions,
}

impl SelectPlugin {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Hook points this plugin registers with the host.
    pub fn hooks(&self) -> &'static [HookPoint] {
        &HookPoint::ALL
    }

    /// Hook point matching the run options.
    pub fn hook_for_run(&self) -> HookPoint {
        if self.options.function.is_some() {
            HookPoint::DeployFunctionInitialize
        } else {
            HookPoint::DeployInitialize
        }
    }

    /// Run selection for `point` against the caller-owned registry.
    pub fn run_hook<R>(
        &self,
        point: HookPoint,
        registry: &mut R,
    ) -> Result<HookOutcome, SelectionError>
    where
        R: UnitRegistry + ?Sized,
    {
        if self.options.no_deploy {
            return Ok(HookOutcome::Skipped);
        }

        let request = match point {
            HookPoint::DeployInitialize => self.options.request(None),
            HookPoint::DeployFunctionInitialize => {
                let function = self
                    .options
                    .function
                    .clone()
                    .ok_or(SelectionError::MissingFunction)?;
                self.options.request(Some(function))
            }
        };

        info!("Select: selecting functions for deployment");
        apply_selection(registry, &request).map(HookOutcome::Applied)
    }
}
