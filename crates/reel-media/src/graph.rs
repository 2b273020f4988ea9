//! Typed filter-graph builder.
//!
//! A graph is an ordered list of [`FilterFragment`]s, each made of
//! [`FilterChain`]s such as `[background][image-0]overlay=...[background]`.
//! Labels in FFmpeg are consumed exactly once, so the builder tracks which
//! labels are live while fragments are appended:
//!
//! - a chain may only read a label that is live or an engine input pad (`1:v`);
//! - reading a label consumes it;
//! - a chain may not produce a label that is still live;
//! - when the graph is finished, the output label must be the only live one.
//!
//! Rewriting the canonical `background` label in every stage is what gives the
//! composite its strict bottom-to-top order.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Canonical label every compositing stage reads and rewrites.
pub const BACKGROUND: &str = "background";

/// Errors raised while assembling a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{fragment}: input [{label}] is not available")]
    MissingInput { fragment: String, label: String },

    #[error("{fragment}: output [{label}] is already live")]
    DuplicateOutput { fragment: String, label: String },

    #[error("graph output [{0}] is never produced")]
    MissingOutput(String),

    #[error("unconsumed outputs: {0:?}")]
    DanglingOutputs(Vec<String>),

    #[error("at least one clip fragment is required")]
    NoClips,
}

/// Named handle into the graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamLabel(String);

impl StreamLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The canonical background label.
    pub fn background() -> Self {
        Self::new(BACKGROUND)
    }

    /// Scaled image of clip `index`.
    pub fn image(index: usize) -> Self {
        Self(format!("image-{index}"))
    }

    /// Intermediate stage of clip `index`, e.g. `image-0-rotated`.
    pub fn image_stage(index: usize, stage: &str) -> Self {
        Self(format!("image-{index}-{stage}"))
    }

    /// Video pad of engine input `n`.
    pub fn input_video(n: usize) -> Self {
        Self(format!("{n}:v"))
    }

    /// Audio pad of engine input `n`.
    pub fn input_audio(n: usize) -> Self {
        Self(format!("{n}:a"))
    }

    /// Engine input pads are always readable and never tracked as live.
    pub fn is_input_pad(&self) -> bool {
        match self.0.split_once(':') {
            Some((index, kind)) => {
                !index.is_empty()
                    && index.chars().all(|c| c.is_ascii_digit())
                    && matches!(kind, "v" | "a")
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// One linear chain: input labels, comma-separated filters, output labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChain {
    inputs: Vec<StreamLabel>,
    filters: Vec<String>,
    outputs: Vec<StreamLabel>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            filters: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, label: StreamLabel) -> Self {
        self.inputs.push(label);
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn output(mut self, label: StreamLabel) -> Self {
        self.outputs.push(label);
        self
    }

    pub fn inputs(&self) -> &[StreamLabel] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[StreamLabel] {
        &self.outputs
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.inputs {
            write!(f, "{label}")?;
        }
        write!(f, "{}", self.filters.join(","))?;
        for label in &self.outputs {
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

/// What produced a fragment; used in errors, logs and ordering checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    BackgroundScale,
    ImageScale { clip: usize },
    Animation { clip: usize, style: &'static str },
    Caption,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::BackgroundScale => write!(f, "background-scale"),
            FragmentKind::ImageScale { clip } => write!(f, "image-scale[{clip}]"),
            FragmentKind::Animation { clip, style } => write!(f, "{style}[{clip}]"),
            FragmentKind::Caption => write!(f, "caption"),
        }
    }
}

/// Ordered chains emitted by one compiler component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFragment {
    kind: FragmentKind,
    chains: Vec<FilterChain>,
}

impl FilterFragment {
    pub fn new(kind: FragmentKind) -> Self {
        Self {
            kind,
            chains: Vec::new(),
        }
    }

    pub fn chain(mut self, chain: FilterChain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }

    pub fn chains(&self) -> &[FilterChain] {
        &self.chains
    }

    /// Labels read from outside the fragment.
    pub fn inputs(&self) -> Vec<StreamLabel> {
        let mut produced: BTreeSet<&StreamLabel> = BTreeSet::new();
        let mut external = Vec::new();
        for chain in &self.chains {
            for label in chain.inputs() {
                if !produced.remove(label) && !external.contains(label) {
                    external.push(label.clone());
                }
            }
            produced.extend(chain.outputs());
        }
        external
    }

    /// Labels left for later fragments to consume.
    pub fn outputs(&self) -> Vec<StreamLabel> {
        let mut live: Vec<StreamLabel> = Vec::new();
        for chain in &self.chains {
            for label in chain.inputs() {
                if let Some(pos) = live.iter().position(|l| l == label) {
                    live.remove(pos);
                }
            }
            live.extend(chain.outputs().iter().cloned());
        }
        live
    }

    /// Chains rendered as filter-graph statements.
    pub fn statements(&self) -> Vec<String> {
        self.chains.iter().map(ToString::to_string).collect()
    }
}

/// Appends fragments while enforcing label continuity.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    fragments: Vec<FilterFragment>,
    live: BTreeSet<StreamLabel>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, checking each chain against the live label set.
    pub fn push(&mut self, fragment: FilterFragment) -> Result<&mut Self, GraphError> {
        for chain in fragment.chains() {
            for label in chain.inputs() {
                if label.is_input_pad() {
                    continue;
                }
                if !self.live.remove(label) {
                    return Err(GraphError::MissingInput {
                        fragment: fragment.kind().to_string(),
                        label: label.as_str().to_string(),
                    });
                }
            }
            for label in chain.outputs() {
                if !self.live.insert(label.clone()) {
                    return Err(GraphError::DuplicateOutput {
                        fragment: fragment.kind().to_string(),
                        label: label.as_str().to_string(),
                    });
                }
            }
        }
        self.fragments.push(fragment);
        Ok(self)
    }

    /// Finish the graph; `output` must be the only live label.
    pub fn finish(self, output: StreamLabel) -> Result<FilterGraph, GraphError> {
        if !self.live.contains(&output) {
            return Err(GraphError::MissingOutput(output.as_str().to_string()));
        }
        let dangling: Vec<String> = self
            .live
            .iter()
            .filter(|l| **l != output)
            .map(|l| l.as_str().to_string())
            .collect();
        if !dangling.is_empty() {
            return Err(GraphError::DanglingOutputs(dangling));
        }
        Ok(FilterGraph {
            fragments: self.fragments,
            output,
        })
    }
}

/// A validated graph, ready to hand to `-filter_complex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    fragments: Vec<FilterFragment>,
    output: StreamLabel,
}

impl FilterGraph {
    pub fn fragments(&self) -> &[FilterFragment] {
        &self.fragments
    }

    /// Label to map as the output video stream.
    pub fn output(&self) -> &StreamLabel {
        &self.output
    }

    /// All statements in order.
    pub fn statements(&self) -> Vec<String> {
        self.fragments.iter().flat_map(|f| f.statements()).collect()
    }

    /// The `-filter_complex` script: statements joined with `;`.
    pub fn to_filter_complex(&self) -> String {
        self.statements().join(";")
    }
}

/// Escape a value for use as a filter option inside a filter graph.
///
/// Two levels apply: the option parser treats `\ ' :` specially, then the
/// graph parser treats `\ ' [ ] , ;` specially. Both levels trim unescaped
/// leading and trailing whitespace. Each level is escaped with a backslash,
/// innermost first.
pub fn escape_filter_value(value: &str) -> String {
    let option_level = escape_chars(value, &['\\', '\'', ':', ' ', '\t', '\n']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';', ' ', '\t', '\n'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
