//! Material database over many sources.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::MaterialError;
use crate::material::MaterialRecord;
use crate::overrides::OverrideTable;
use crate::report::{ConversionEvent, Reporter};
use crate::source::MaterialSource;

/// Material records keyed by unique name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDatabase {
    records: BTreeMap<String, MaterialRecord>,
}

impl MaterialDatabase {
    /// Assemble every material of `sources`.
    ///
    /// The first source declaring a name wins; later declarations are skipped
    /// with a warning and never consume an override. Overrides naming a
    /// material absent from every source fail the build once all sources have
    /// been read.
    pub fn build<S: MaterialSource>(
        sources: &[S],
        mut overrides: OverrideTable,
        reporter: &dyn Reporter,
    ) -> Result<Self, MaterialError> {
        let mut records = BTreeMap::new();

        for source in sources {
            reporter.report(ConversionEvent::SourceParsing {
                source: source.label().to_string(),
                materials: source.materials().len(),
            });

            for material in source.materials() {
                match records.entry(material.name.clone()) {
                    Entry::Occupied(kept) => {
                        let kept: &MaterialRecord = kept.get();
                        reporter.report(ConversionEvent::DuplicateMaterial {
                            material: material.name.clone(),
                            kept_from: kept.source.clone(),
                            skipped_from: source.label().to_string(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        let record_overrides = overrides.take(&material.name);
                        slot.insert(MaterialRecord::assemble(material, source, &record_overrides)?);
                    }
                }
            }
        }

        overrides.finish()?;

        reporter.report(ConversionEvent::MaterialsParsed { count: records.len() });
        Ok(Self { records })
    }

    pub fn get(&self, name: &str) -> Option<&MaterialRecord> {
        self.records.get(name)
    }

    /// Records in name order.
    pub fn records(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
