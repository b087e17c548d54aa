//! CURIE identifier normalization
//!
//! Rewrites compact identifiers like `NCBIGene:1017` into the native
//! `field:term` form the annotation endpoints understand (`entrezgene:1017`).
//! Prefix matching is case-insensitive; unknown prefixes pass through.

use crate::config::CuriePrefix;
use crate::error::Result;
use regex::Regex;

#[derive(Debug, Clone, Default)]
pub struct CurieTransformer {
    patterns: Vec<(Regex, String)>,
}

impl CurieTransformer {
    pub fn new(prefixes: &[CuriePrefix]) -> Result<Self> {
        let patterns = prefixes
            .iter()
            .map(|p| -> Result<(Regex, String)> {
                let re = Regex::new(&format!(
                    r"(?i)^{}:(?P<term>[^:]+)$",
                    regex::escape(&p.prefix)
                ))?;
                Ok((re, p.field.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn transform(&self, id: &str) -> String {
        for (re, field) in &self.patterns {
            if let Some(caps) = re.captures(id) {
                return format!("{}:{}", field, &caps["term"]);
            }
        }
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntitySettings;

    fn gene() -> CurieTransformer {
        CurieTransformer::new(&EntitySettings::builtin("gene").unwrap().curie_prefixes).unwrap()
    }

    #[test]
    fn test_known_prefixes() {
        let t = gene();
        assert_eq!(t.transform("NCBIGene:1017"), "entrezgene:1017");
        assert_eq!(t.transform("ncbigene:1017"), "entrezgene:1017");
        assert_eq!(t.transform("ENSEMBL:ENSG00000123374"), "ensembl.gene:ENSG00000123374");
        assert_eq!(t.transform("UniProtKB:P24941"), "uniprot.Swiss-Prot:P24941");
    }

    #[test]
    fn test_passthrough() {
        let t = gene();
        assert_eq!(t.transform("1017"), "1017");
        assert_eq!(t.transform("HGNC:1771"), "HGNC:1771");
        assert_eq!(t.transform("NCBIGene:1017:extra"), "NCBIGene:1017:extra");
    }

    #[test]
    fn test_dotted_prefix_is_literal() {
        let chem = CurieTransformer::new(&EntitySettings::builtin("chem").unwrap().curie_prefixes)
            .unwrap();
        assert_eq!(chem.transform("PUBCHEM.COMPOUND:2244"), "pubchem.cid:2244");
        assert_eq!(chem.transform("PUBCHEMxCOMPOUND:2244"), "PUBCHEMxCOMPOUND:2244");
    }

    #[test]
    fn test_empty() {
        let t = CurieTransformer::default();
        assert!(t.is_empty());
        assert_eq!(t.transform("NCBIGene:1017"), "NCBIGene:1017");
    }
}
