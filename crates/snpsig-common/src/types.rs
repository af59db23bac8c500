//! Common types used across snpsig

use serde::{Deserialize, Serialize};

/// A single variant read from a raw genotype export.
///
/// One record corresponds to one data line of the input file. Field values
/// are carried verbatim from the export; `position` stays a string because
/// the export is never validated numerically and chromosomes such as `MT`
/// pair with positions the tool only ever copies into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// dbSNP reference identifier (e.g., "rs4477212")
    pub rsid: String,

    /// Chromosome name (1-22, X, Y, MT)
    pub chromosome: String,

    /// 1-based position on the chromosome, verbatim from the export
    pub position: String,

    /// Observed genotype call (e.g., "AA", "AG", "--")
    pub genotype: String,
}

impl VariantRecord {
    pub fn new(
        rsid: impl Into<String>,
        chromosome: impl Into<String>,
        position: impl Into<String>,
        genotype: impl Into<String>,
    ) -> Self {
        Self {
            rsid: rsid.into(),
            chromosome: chromosome.into(),
            position: position.into(),
            genotype: genotype.into(),
        }
    }
}

/// The annotated form of a [`VariantRecord`].
///
/// Exactly one result exists per input record, correlated by `rsid`.
/// `clinical_significance` is always populated: either the value reported
/// by the annotation service, the "No known implications" marker, or a
/// descriptive error string for a fetch that could not be completed.
///
/// The serde renames produce the report column headers
/// (`SNP,Chromosome,Position,Implications`) when serialized as CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationResult {
    /// dbSNP reference identifier, copied from the source record
    #[serde(rename = "SNP")]
    pub rsid: String,

    /// Chromosome name, copied from the source record
    #[serde(rename = "Chromosome")]
    pub chromosome: String,

    /// Position, copied from the source record
    #[serde(rename = "Position")]
    pub position: String,

    /// Clinical significance text for this variant
    #[serde(rename = "Implications")]
    pub clinical_significance: String,
}

impl AnnotationResult {
    /// Combine a source record with its fetched significance text.
    ///
    /// Consumes the record: each input is annotated exactly once and the
    /// genotype column is not carried into the report.
    pub fn new(record: VariantRecord, clinical_significance: impl Into<String>) -> Self {
        Self {
            rsid: record.rsid,
            chromosome: record.chromosome,
            position: record.position,
            clinical_significance: clinical_significance.into(),
        }
    }
}
