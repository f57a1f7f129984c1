//! Shared fixtures: a file-details probe/subject and mock factories.

use capability_registry::registry::{
    DynEnrichmentFactory, DynProviderFactory, EnrichmentFactory, ProviderFactory,
    RegisteredFactory,
};
use capability_registry::{CreationError, StepError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What is known about a file while it is being identified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDetails {
    pub name: String,
    pub media_type: Option<String>,
    pub format: Option<String>,
    pub tags: Vec<String>,
}

impl FileDetails {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_media_type(mut self, media_type: &str) -> Self {
        self.media_type = Some(media_type.to_string());
        self
    }

    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, extension)| extension)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Provider handed out by [`MockValidatorFactory`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockValidator {
    pub factory: String,
    pub target: String,
}

pub type ValidatorFactory = DynProviderFactory<FileDetails, MockValidator>;

/// Validator factory with a fixed score and a probe counter.
#[derive(Debug)]
pub struct MockValidatorFactory {
    name: String,
    identifiers: Vec<String>,
    score: Option<f64>,
    fail_creation: bool,
    probes: AtomicUsize,
}

impl MockValidatorFactory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            identifiers: Vec::new(),
            score: None,
            fail_creation: false,
            probes: AtomicUsize::new(0),
        }
    }

    pub fn claiming(mut self, identifiers: &[&str]) -> Self {
        self.identifiers = identifiers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn scoring(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    pub fn probes_seen(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn build(&self, target: &str) -> Result<MockValidator, CreationError> {
        if self.fail_creation {
            return Err(CreationError::new(&self.name, target, "schema unavailable"));
        }
        Ok(MockValidator {
            factory: self.name.clone(),
            target: target.to_string(),
        })
    }
}

impl RegisteredFactory for MockValidatorFactory {
    fn factory_name(&self) -> &str {
        &self.name
    }

    fn identifiers(&self) -> Vec<String> {
        self.identifiers.clone()
    }
}

impl ProviderFactory for MockValidatorFactory {
    type Probe = FileDetails;
    type Provider = MockValidator;

    fn supports(&self, _probe: &FileDetails) -> Option<f64> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.score
    }

    fn create(&self, identifier: &str) -> Result<MockValidator, CreationError> {
        self.build(identifier)
    }

    fn create_for_probe(&self, probe: &FileDetails) -> Result<MockValidator, CreationError> {
        self.build(&probe.name)
    }
}

pub type Enricher = DynEnrichmentFactory<FileDetails>;

/// Adds one tag to a file, optionally only after another tag is present.
#[derive(Debug)]
pub struct TaggingEnricher {
    tag: String,
    requires: Option<String>,
    fail: bool,
    applied: AtomicUsize,
}

impl TaggingEnricher {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            requires: None,
            fail: false,
            applied: AtomicUsize::new(0),
        }
    }

    pub fn after(mut self, tag: &str) -> Self {
        self.requires = Some(tag.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn times_applied(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

impl RegisteredFactory for TaggingEnricher {
    fn factory_name(&self) -> &str {
        &self.tag
    }
}

impl EnrichmentFactory for TaggingEnricher {
    type Subject = FileDetails;

    fn accepts(&self, subject: &FileDetails) -> bool {
        self.requires
            .as_deref()
            .map_or(true, |required| subject.has_tag(required))
    }

    fn enrich(&self, subject: &FileDetails) -> Result<FileDetails, StepError> {
        if self.fail {
            return Err(StepError::new(&self.tag, "could not read file"));
        }
        self.applied.fetch_add(1, Ordering::SeqCst);
        let mut next = subject.clone();
        next.tags.push(self.tag.clone());
        Ok(next)
    }
}

/// Factory that only advertises identifiers, for registry-level tests.
#[derive(Debug)]
pub struct IdentifierFactory {
    pub name: String,
    pub identifiers: Vec<String>,
}

impl IdentifierFactory {
    pub fn arc(name: impl Into<String>, identifiers: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            identifiers,
        })
    }
}

impl RegisteredFactory for IdentifierFactory {
    fn factory_name(&self) -> &str {
        &self.name
    }

    fn identifiers(&self) -> Vec<String> {
        self.identifiers.clone()
    }
}
