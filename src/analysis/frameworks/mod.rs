//! Framework conventions: files a framework loads without an explicit
//! import, and usage that only shows up in templates or JSX.
//!
//! The active set is chosen once per run by [`FrameworkManager::select`].
//! At most one React-family analyzer (Next.js over React) and one
//! Vue-family analyzer (Nuxt over Vue) is active.

pub mod jsx;
pub mod nextjs;
pub mod react;
pub mod svelte;
pub mod vue;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::context::ProjectIndex;

pub use nextjs::NextJsAnalyzer;
pub use react::ReactAnalyzer;
pub use svelte::SvelteAnalyzer;
pub use vue::{NuxtAnalyzer, VueAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    NextJs,
    React,
    Vue,
    Nuxt,
    Svelte,
}

impl FrameworkKind {
    pub const ALL: [FrameworkKind; 5] = [
        FrameworkKind::NextJs,
        FrameworkKind::React,
        FrameworkKind::Vue,
        FrameworkKind::Nuxt,
        FrameworkKind::Svelte,
    ];

    /// Key used in manifest framework hints.
    pub fn name(&self) -> &'static str {
        match self {
            FrameworkKind::NextJs => "next",
            FrameworkKind::React => "react",
            FrameworkKind::Vue => "vue",
            FrameworkKind::Nuxt => "nuxt",
            FrameworkKind::Svelte => "svelte",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "next" | "nextjs" | "next.js" => Some(FrameworkKind::NextJs),
            "react" => Some(FrameworkKind::React),
            "vue" => Some(FrameworkKind::Vue),
            "nuxt" => Some(FrameworkKind::Nuxt),
            "svelte" | "sveltekit" => Some(FrameworkKind::Svelte),
            _ => None,
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A file a framework treats as a root, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: String,
    pub framework: FrameworkKind,
    pub reason: &'static str,
}

impl EntryPoint {
    pub fn new(path: impl Into<String>, framework: FrameworkKind, reason: &'static str) -> Self {
        Self {
            path: path.into(),
            framework,
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FrameworkAnalyzer {
    NextJs(NextJsAnalyzer),
    React(ReactAnalyzer),
    Vue(VueAnalyzer),
    Nuxt(NuxtAnalyzer),
    Svelte(SvelteAnalyzer),
}

impl FrameworkAnalyzer {
    pub fn for_kind(kind: FrameworkKind) -> Self {
        match kind {
            FrameworkKind::NextJs => FrameworkAnalyzer::NextJs(NextJsAnalyzer),
            FrameworkKind::React => FrameworkAnalyzer::React(ReactAnalyzer),
            FrameworkKind::Vue => FrameworkAnalyzer::Vue(VueAnalyzer),
            FrameworkKind::Nuxt => FrameworkAnalyzer::Nuxt(NuxtAnalyzer),
            FrameworkKind::Svelte => FrameworkAnalyzer::Svelte(SvelteAnalyzer),
        }
    }

    pub fn kind(&self) -> FrameworkKind {
        match self {
            FrameworkAnalyzer::NextJs(_) => FrameworkKind::NextJs,
            FrameworkAnalyzer::React(_) => FrameworkKind::React,
            FrameworkAnalyzer::Vue(_) => FrameworkKind::Vue,
            FrameworkAnalyzer::Nuxt(_) => FrameworkKind::Nuxt,
            FrameworkAnalyzer::Svelte(_) => FrameworkKind::Svelte,
        }
    }

    /// File-based probe, independent of manifest hints.
    pub fn is_framework_detected(&self, ctx: &ProjectIndex) -> bool {
        match self {
            FrameworkAnalyzer::NextJs(a) => a.is_detected(ctx),
            FrameworkAnalyzer::React(a) => a.is_detected(ctx),
            FrameworkAnalyzer::Vue(a) => a.is_detected(ctx),
            FrameworkAnalyzer::Nuxt(a) => a.is_detected(ctx),
            FrameworkAnalyzer::Svelte(a) => a.is_detected(ctx),
        }
    }

    pub fn detect_entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        match self {
            FrameworkAnalyzer::NextJs(a) => a.entry_points(ctx),
            FrameworkAnalyzer::React(a) => a.entry_points(ctx),
            FrameworkAnalyzer::Vue(a) => a.entry_points(ctx),
            FrameworkAnalyzer::Nuxt(a) => a.entry_points(ctx),
            FrameworkAnalyzer::Svelte(a) => a.entry_points(ctx),
        }
    }

    /// Files used through convention rather than a plain import.
    pub fn detect_usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        match self {
            FrameworkAnalyzer::NextJs(a) => a.usage(ctx),
            FrameworkAnalyzer::React(a) => a.usage(ctx),
            FrameworkAnalyzer::Vue(a) => a.usage(ctx),
            FrameworkAnalyzer::Nuxt(a) => a.usage(ctx),
            FrameworkAnalyzer::Svelte(a) => a.usage(ctx),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameworkManager {
    analyzers: Vec<FrameworkAnalyzer>,
}

impl FrameworkManager {
    /// Picks the active analyzers from manifest hints and file probes.
    pub fn select(hints: &BTreeMap<String, bool>, ctx: &ProjectIndex) -> Self {
        let hinted: BTreeSet<FrameworkKind> = hints
            .iter()
            .filter(|(_, enabled)| **enabled)
            .filter_map(|(name, _)| FrameworkKind::from_name(name))
            .collect();
        let active = |kind: FrameworkKind| {
            hinted.contains(&kind) || FrameworkAnalyzer::for_kind(kind).is_framework_detected(ctx)
        };

        let mut kinds = Vec::new();
        if active(FrameworkKind::NextJs) {
            kinds.push(FrameworkKind::NextJs);
        } else if active(FrameworkKind::React) {
            kinds.push(FrameworkKind::React);
        }
        if active(FrameworkKind::Nuxt) {
            kinds.push(FrameworkKind::Nuxt);
        } else if active(FrameworkKind::Vue) {
            kinds.push(FrameworkKind::Vue);
        }
        if active(FrameworkKind::Svelte) {
            kinds.push(FrameworkKind::Svelte);
        }

        debug!(frameworks = ?kinds, "selected framework analyzers");
        Self {
            analyzers: kinds.into_iter().map(FrameworkAnalyzer::for_kind).collect(),
        }
    }

    pub fn analyzers(&self) -> &[FrameworkAnalyzer] {
        &self.analyzers
    }

    pub fn kinds(&self) -> Vec<FrameworkKind> {
        self.analyzers.iter().map(FrameworkAnalyzer::kind).collect()
    }

    pub fn entry_points(&self, ctx: &ProjectIndex) -> Vec<EntryPoint> {
        self.analyzers
            .iter()
            .flat_map(|a| a.detect_entry_points(ctx))
            .collect()
    }

    pub fn usage(&self, ctx: &ProjectIndex) -> BTreeSet<String> {
        self.analyzers.iter().flat_map(|a| a.detect_usage(ctx)).collect()
    }
}
