//! Translator registry: one [`Translator`] per statement kind.
//!
//! The registry is built once and shared read-only. Lookups index a dense
//! table by kind, so they never fail once [`RegistryBuilder::build`] has
//! checked that every kind is covered exactly once.

use tracing::trace;

use crate::error::ConfigError;
use crate::model::AxiomKind;
use crate::translate::{Translator, shape_of};

/// Immutable kind → translator table.
#[derive(Debug, Clone)]
pub struct TranslatorRegistry {
    /// Indexed by `AxiomKind as usize`.
    translators: Vec<Translator>,
}

impl TranslatorRegistry {
    /// Registry covering every kind with its standard shape.
    pub fn standard() -> Self {
        Self {
            translators: AxiomKind::ALL.iter().map(|k| Translator::for_kind(*k)).collect(),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The translator handling `kind`.
    pub fn lookup(&self, kind: AxiomKind) -> &Translator {
        &self.translators[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Translator> {
        self.translators.iter()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collects translators and checks coverage on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registered: Vec<Translator>,
}

impl RegistryBuilder {
    pub fn register(mut self, translator: Translator) -> Self {
        self.registered.push(translator);
        self
    }

    /// Register the standard translator for every kind not yet covered.
    pub fn with_standard(mut self) -> Self {
        for kind in AxiomKind::ALL {
            if !self.registered.iter().any(|t| t.kind() == *kind) {
                self.registered.push(Translator::for_kind(*kind));
            }
        }
        self
    }

    /// Fails on a kind registered twice, a kind left without translator,
    /// or a translator whose shape does not fit its kind.
    pub fn build(self) -> Result<TranslatorRegistry, ConfigError> {
        let mut slots: Vec<Option<Translator>> = vec![None; AxiomKind::ALL.len()];
        for translator in self.registered {
            let expected = shape_of(translator.kind());
            if translator.shape() != expected {
                return Err(ConfigError::ShapeMismatch {
                    kind: translator.kind().to_string(),
                    shape: format!("{:?}", translator.shape()),
                    expected: format!("{expected:?}"),
                });
            }
            let slot = &mut slots[translator.kind() as usize];
            if slot.is_some() {
                return Err(ConfigError::DuplicateTranslator {
                    kind: translator.kind().to_string(),
                });
            }
            trace!(kind = %translator.kind(), shape = ?translator.shape(), "registered translator");
            *slot = Some(translator);
        }
        let translators = slots
            .into_iter()
            .zip(AxiomKind::ALL)
            .map(|(slot, kind)| {
                slot.ok_or_else(|| ConfigError::MissingTranslator {
                    kind: kind.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TranslatorRegistry { translators })
    }
}
