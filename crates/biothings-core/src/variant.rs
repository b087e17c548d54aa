//! Variant helpers: VCF records to genomic HGVS ids

use crate::error::{BiothingsError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

lazy_static! {
    static ref ALLELE: Regex = Regex::new(r"^[ACGTNacgtn]+$").unwrap();
}

fn strip_chr(chrom: &str) -> &str {
    match chrom.get(..3) {
        Some(p) if p.eq_ignore_ascii_case("chr") => &chrom[3..],
        _ => chrom,
    }
}

fn invalid(chrom: &str, pos: u64, ref_: &str, alt: &str, why: &str) -> BiothingsError {
    BiothingsError::InvalidInput(format!(
        "cannot convert ({}, {}, {}, {}) into HGVS id: {}",
        chrom, pos, ref_, alt, why
    ))
}

fn check_alleles(chrom: &str, pos: u64, ref_: &str, alt: &str) -> Result<()> {
    if ref_.is_empty() || alt.is_empty() {
        return Err(invalid(chrom, pos, ref_, alt, "empty allele"));
    }
    if !ALLELE.is_match(ref_) || !ALLELE.is_match(alt) {
        return Err(invalid(chrom, pos, ref_, alt, "allele is not a nucleotide sequence"));
    }
    Ok(())
}

/// Trim the bases shared on the left of `ref_` and `alt`, shifting `pos`
///
/// `CTTTT/CT` becomes `TTTT/T` one position later; `TC/TG` becomes `C/G`.
pub fn normalized_vcf(
    chrom: &str,
    pos: u64,
    ref_: &str,
    alt: &str,
) -> Result<(String, u64, String, String)> {
    check_alleles(chrom, pos, ref_, alt)?;
    if ref_ == alt {
        return Err(invalid(chrom, pos, ref_, alt, "ref and alt are identical"));
    }

    let (rb, ab) = (ref_.as_bytes(), alt.as_bytes());
    let n = rb.len().max(ab.len());
    let i = (0..n).find(|&i| rb.get(i) != ab.get(i)).unwrap_or(n);

    if i < rb.len() && i < ab.len() {
        Ok((
            chrom.to_string(),
            pos + i as u64,
            ref_[i..].to_string(),
            alt[i..].to_string(),
        ))
    } else {
        // one allele is a prefix of the other: keep one anchor base
        let start = i - 1;
        Ok((
            chrom.to_string(),
            pos + start as u64,
            ref_[start..].to_string(),
            alt[start..].to_string(),
        ))
    }
}

/// Genomic HGVS id for a VCF-style `chrom, pos, ref, alt` record
///
/// ```
/// use biothings_core::variant::format_hgvs;
/// assert_eq!(format_hgvs("1", 35366, "C", "T").unwrap(), "chr1:g.35366C>T");
/// assert_eq!(format_hgvs("2", 17142, "G", "GA").unwrap(), "chr2:g.17142_17143insA");
/// ```
pub fn format_hgvs(chrom: &str, pos: u64, ref_: &str, alt: &str) -> Result<String> {
    let chrom = strip_chr(chrom);
    check_alleles(chrom, pos, ref_, alt)?;
    let (r, a) = (ref_.len(), alt.len());
    let (rb, ab) = (ref_.as_bytes(), alt.as_bytes());
    let end = pos + r as u64 - 1;

    let hgvs = if r == 1 && a == 1 {
        format!("chr{}:g.{}{}>{}", chrom, pos, ref_, alt)
    } else if r > 1 && a == 1 {
        if rb[0] == ab[0] {
            let start = pos + 1;
            if start == end {
                format!("chr{}:g.{}del", chrom, start)
            } else {
                format!("chr{}:g.{}_{}del", chrom, start, end)
            }
        } else {
            format!("chr{}:g.{}_{}delins{}", chrom, pos, end, alt)
        }
    } else if r == 1 && a > 1 {
        if ab[0] == rb[0] {
            format!("chr{}:g.{}_{}ins{}", chrom, pos, pos + 1, &alt[1..])
        } else {
            format!("chr{}:g.{}delins{}", chrom, pos, alt)
        }
    } else if rb[0] == ab[0] {
        let (chrom, pos, ref_, alt) = normalized_vcf(chrom, pos, ref_, alt)?;
        return format_hgvs(&chrom, pos, &ref_, &alt);
    } else {
        format!("chr{}:g.{}_{}delins{}", chrom, pos, end, alt)
    };
    Ok(hgvs)
}

/// Lazy reader turning VCF data lines into HGVS ids, one per ALT allele
pub struct HgvsFromVcf<R> {
    lines: Lines<R>,
    pending: VecDeque<String>,
    line_no: usize,
}

impl<R: BufRead> HgvsFromVcf<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: VecDeque::new(),
            line_no: 0,
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<()> {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 5 {
            return Err(BiothingsError::InvalidInput(format!(
                "VCF line {}: expected at least 5 tab-separated columns, got {}",
                self.line_no,
                cols.len()
            )));
        }
        let pos: u64 = cols[1].parse().map_err(|_| {
            BiothingsError::InvalidInput(format!(
                "VCF line {}: invalid position '{}'",
                self.line_no, cols[1]
            ))
        })?;
        let chrom = strip_chr(cols[0]);
        for alt in cols[4].split(',') {
            self.pending.push_back(format_hgvs(chrom, pos, cols[3], alt)?);
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for HgvsFromVcf<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hgvs) = self.pending.pop_front() {
                return Some(Ok(hgvs));
            }
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.starts_with('#') {
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Err(e) = self.parse_line(line) {
                return Some(Err(e));
            }
        }
    }
}

/// Open a VCF file for lazy HGVS conversion
pub fn hgvs_from_vcf_file(path: &Path) -> Result<HgvsFromVcf<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(HgvsFromVcf::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snp() {
        assert_eq!(format_hgvs("1", 35366, "C", "T").unwrap(), "chr1:g.35366C>T");
        assert_eq!(format_hgvs("chr1", 35366, "C", "T").unwrap(), "chr1:g.35366C>T");
    }

    #[test]
    fn test_deletions() {
        assert_eq!(
            format_hgvs("MT", 8270, "CACCCCCTCT", "C").unwrap(),
            "chrMT:g.8271_8279del"
        );
        assert_eq!(format_hgvs("1", 100, "CA", "C").unwrap(), "chr1:g.101del");
        assert_eq!(
            format_hgvs("X", 107930849, "GGA", "C").unwrap(),
            "chrX:g.107930849_107930851delinsC"
        );
    }

    #[test]
    fn test_insertions() {
        assert_eq!(format_hgvs("2", 17142, "G", "GA").unwrap(), "chr2:g.17142_17143insA");
        assert_eq!(format_hgvs("2", 17142, "G", "TA").unwrap(), "chr2:g.17142delinsTA");
    }

    #[test]
    fn test_left_overlap_normalized() {
        assert_eq!(format_hgvs("1", 100, "CTTTT", "CT").unwrap(), "chr1:g.102_104del");
        assert_eq!(format_hgvs("1", 100, "TC", "TG").unwrap(), "chr1:g.101C>G");
        assert_eq!(
            normalized_vcf("1", 100, "CTTTT", "CT").unwrap(),
            ("1".to_string(), 101, "TTTT".to_string(), "T".to_string())
        );
    }

    #[test]
    fn test_invalid_alleles() {
        assert!(format_hgvs("1", 100, "", "T").is_err());
        assert!(normalized_vcf("1", 100, "AC", "AC").is_err());
        assert!(format_hgvs("1", 100, "A", "<DEL>").is_err());
    }

    #[test]
    fn test_vcf_reader() {
        let vcf = "##fileformat=VCFv4.1\n#CHROM\tPOS\tID\tREF\tALT\n\nchr1\t35366\t.\tC\tT,G\n2\t17142\trs1\tG\tGA\n";
        let ids: Vec<String> = HgvsFromVcf::new(vcf.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            ids,
            vec!["chr1:g.35366C>T", "chr1:g.35366C>G", "chr2:g.17142_17143insA"]
        );
    }

    #[test]
    fn test_vcf_reader_bad_line() {
        let vcf = "1\tnotanumber\t.\tC\tT\n";
        let mut reader = HgvsFromVcf::new(vcf.as_bytes());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_vcf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.vcf");
        std::fs::write(&path, "#header\nchr7\t140453136\t.\tA\tT\n").unwrap();
        let ids: Vec<String> = hgvs_from_vcf_file(&path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(ids, vec!["chr7:g.140453136A>T"]);
    }
}
