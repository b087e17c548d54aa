//! Declarative per-entity client settings
//!
//! Each BioThings service (mygene.info, myvariant.info, ...) is described by an
//! [`EntitySettings`] record: where it lives, which endpoints it exposes, and which
//! method names callers may use for each engine operation.

use crate::error::{BiothingsError, Result};
use serde::{Deserialize, Serialize};

/// Entity names with built-in settings
pub const BUILTIN_CLIENTS: &[&str] = &[
    "gene", "variant", "taxon", "drug", "chem", "compound", "disease", "geneset",
];

const DEFAULT_QUERY_ENDPOINT: &str = "/query/";
const DEFAULT_METADATA_ENDPOINT: &str = "/metadata";
const DEFAULT_METADATA_FIELDS_ENDPOINT: &str = "/metadata/fields";

/// Engine operation a method name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetAnnotation,
    GetAnnotations,
    Query,
    QueryMany,
    Metadata,
    GetFields,
    SetCaching,
    StopCaching,
    ClearCache,
    HgvsFromVcf,
    FormatHgvs,
}

/// A caller-facing method name bound to an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodAlias {
    pub name: String,
    pub operation: Operation,
    #[serde(default)]
    pub deprecated: bool,
}

impl MethodAlias {
    fn new(name: &str, operation: Operation) -> Self {
        Self {
            name: name.to_string(),
            operation,
            deprecated: false,
        }
    }

    fn deprecated(name: &str, operation: Operation) -> Self {
        Self {
            deprecated: true,
            ..Self::new(name, operation)
        }
    }
}

/// CURIE prefix rewritten into a native `field:term` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuriePrefix {
    pub prefix: String,
    pub field: String,
}

impl CuriePrefix {
    fn new(prefix: &str, field: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            field: field.to_string(),
        }
    }
}

/// Settings record for one BioThings entity service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySettings {
    /// Entity name, e.g. "gene"
    pub entity: String,
    /// Display name of the client, e.g. "MyGeneInfo"
    pub type_name: String,
    pub default_url: String,
    /// Annotation endpoint, with leading and trailing slash
    pub annotation_endpoint: String,
    pub query_endpoint: String,
    pub metadata_endpoint: String,
    pub metadata_fields_endpoint: String,
    /// File stem of the local response cache
    pub default_cache_file: String,
    /// Label used in progress logs, e.g. "gene(s)"
    pub plural_label: String,
    pub aliases: Vec<MethodAlias>,
    #[serde(default)]
    pub curie_prefixes: Vec<CuriePrefix>,
}

impl EntitySettings {
    /// Look up built-in settings by entity name (case-insensitive)
    pub fn builtin(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let settings = match name.as_str() {
            "gene" => Self::base("gene", "MyGeneInfo", "https://mygene.info/v3", "gene(s)")
                .with_annotation_aliases("getgene", "getgenes")
                .with_alias(MethodAlias::deprecated("findgenes", Operation::QueryMany))
                .with_curie("NCBIGene", "entrezgene")
                .with_curie("ENSEMBL", "ensembl.gene")
                .with_curie("UniProtKB", "uniprot.Swiss-Prot"),
            "variant" => Self::base(
                "variant",
                "MyVariantInfo",
                "https://myvariant.info/v1",
                "variant(s)",
            )
            .with_annotation_aliases("getvariant", "getvariants")
            .with_alias(MethodAlias::new("get_hgvs_from_vcf", Operation::HgvsFromVcf))
            .with_alias(MethodAlias::new("format_hgvs", Operation::FormatHgvs)),
            "chem" | "drug" | "compound" => {
                Self::base("chem", "MyChemInfo", "https://mychem.info/v1", "chem(s)")
                    .with_annotation_aliases("getchem", "getchems")
                    .with_annotation_aliases("getdrug", "getdrugs")
                    .with_curie("PUBCHEM.COMPOUND", "pubchem.cid")
                    .with_curie("CHEMBL.COMPOUND", "chembl.molecule_chembl_id")
                    .with_curie("DRUGBANK", "drugbank.id")
            }
            "disease" => Self::base(
                "disease",
                "MyDiseaseInfo",
                "https://mydisease.info/v1",
                "disease(s)",
            )
            .with_annotation_aliases("getdisease", "getdiseases"),
            "taxon" => Self::base(
                "taxon",
                "MyTaxonInfo",
                "https://t.biothings.io/v1",
                "taxon/taxa",
            )
            .with_annotation_aliases("gettaxon", "gettaxa"),
            "geneset" => Self::base(
                "geneset",
                "MyGenesetInfo",
                "https://mygeneset.info/v1",
                "geneset(s)",
            )
            .with_annotation_aliases("getgeneset", "getgenesets"),
            _ => return None,
        };
        Some(settings)
    }

    /// Resolve settings for an entity, generating them when a URL is supplied
    /// for an entity without built-in settings.
    pub fn resolve(biothing_type: &str, url: Option<&str>) -> Result<Self> {
        let name = biothing_type.trim();
        if name.is_empty() {
            return Err(BiothingsError::InvalidInput(
                "biothing type must not be empty".to_string(),
            ));
        }
        if let Some(settings) = Self::builtin(name) {
            return Ok(settings);
        }
        match url {
            Some(url) => Ok(Self::generate(name, url)),
            None => Err(BiothingsError::UnknownClient {
                name: name.to_string(),
                available: BUILTIN_CLIENTS.join(", "),
            }),
        }
    }

    /// Generate settings for a service that has no built-in record
    pub fn generate(biothing_type: &str, url: &str) -> Self {
        let entity = biothing_type.to_lowercase();
        let type_name = format!("My{}Info", title_case(&entity));
        let single = format!("get{}", entity);
        let many = format!("get{}", pluralize(&entity, false));

        let mut settings = Self::base(&entity, &type_name, url, &pluralize(&entity, true));
        settings.aliases.push(MethodAlias::new(&single, Operation::GetAnnotation));
        settings.aliases.push(MethodAlias::new(&many, Operation::GetAnnotations));
        settings
    }

    fn base(entity: &str, type_name: &str, default_url: &str, plural_label: &str) -> Self {
        Self {
            entity: entity.to_string(),
            type_name: type_name.to_string(),
            default_url: default_url.to_string(),
            annotation_endpoint: format!("/{}/", entity),
            query_endpoint: DEFAULT_QUERY_ENDPOINT.to_string(),
            metadata_endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            metadata_fields_endpoint: DEFAULT_METADATA_FIELDS_ENDPOINT.to_string(),
            default_cache_file: format!("my{}_cache", entity),
            plural_label: plural_label.to_string(),
            aliases: common_aliases(),
            curie_prefixes: Vec::new(),
        }
    }

    fn with_annotation_aliases(self, single: &str, many: &str) -> Self {
        self.with_alias(MethodAlias::new(single, Operation::GetAnnotation))
            .with_alias(MethodAlias::new(many, Operation::GetAnnotations))
    }

    fn with_alias(mut self, alias: MethodAlias) -> Self {
        self.aliases.push(alias);
        self
    }

    fn with_curie(mut self, prefix: &str, field: &str) -> Self {
        self.curie_prefixes.push(CuriePrefix::new(prefix, field));
        self
    }

    /// Resolve a method name through the alias table
    pub fn resolve_method(&self, name: &str) -> Option<&MethodAlias> {
        self.aliases.iter().find(|a| a.name == name)
    }

    /// All method names bound to an operation
    pub fn method_names(&self, operation: Operation) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|a| a.operation == operation)
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Whether this entity exposes an operation under any name
    pub fn supports(&self, operation: Operation) -> bool {
        self.aliases.iter().any(|a| a.operation == operation)
    }
}

fn common_aliases() -> Vec<MethodAlias> {
    vec![
        MethodAlias::new("clear_cache", Operation::ClearCache),
        MethodAlias::new("get_fields", Operation::GetFields),
        MethodAlias::new("metadata", Operation::Metadata),
        MethodAlias::new("query", Operation::Query),
        MethodAlias::new("querymany", Operation::QueryMany),
        MethodAlias::new("set_caching", Operation::SetCaching),
        MethodAlias::new("stop_caching", Operation::StopCaching),
    ]
}

fn pluralize(s: &str, optional: bool) -> String {
    let suffix = if s.ends_with('s') { "es" } else { "s" };
    if optional {
        format!("{}({})", s, suffix)
    } else {
        format!("{}{}", s, suffix)
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
