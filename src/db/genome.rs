//! Arena-backed view of a genome's genes and transcripts.
//!
//! Genes own transcripts and transcripts point back at their gene. Both directions are
//! expressed with copyable handles into flat vectors, so the graph has no ownership
//! cycles and can be shared read-only across worker threads.

use crate::model::record::ContactKind;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TranscriptId(u32);

#[derive(Debug, Clone)]
pub struct Gene {
    pub id: String,
    transcripts: Vec<TranscriptId>,
}

impl Gene {
    pub fn transcripts(&self) -> &[TranscriptId] {
        &self.transcripts
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub id: String,
    pub chromosome: String,
    protein: String,
    gene: GeneId,
}

impl Transcript {
    /// Protein sequence without a trailing stop symbol.
    pub fn protein(&self) -> &str {
        &self.protein
    }

    pub fn protein_len(&self) -> usize {
        self.protein.len()
    }

    /// Amino acid at a zero-based protein index.
    pub fn amino_acid_at(&self, index: usize) -> Option<char> {
        self.protein.as_bytes().get(index).map(|b| *b as char)
    }

    pub fn gene(&self) -> GeneId {
        self.gene
    }
}

/// Gene-anchored marker for one side of a residue interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionLocus {
    pub transcript: TranscriptId,
    /// One-based amino-acid position in `transcript`.
    pub position: usize,
    /// Transcript carrying the other side of the interaction.
    pub partner: TranscriptId,
    pub interaction_id: String,
    pub kind: ContactKind,
}

#[derive(Debug, Clone, Default)]
pub struct Genome {
    genes: Vec<Gene>,
    transcripts: Vec<Transcript>,
    loci: Vec<Vec<InteractionLocus>>,
    genes_by_id: HashMap<String, GeneId>,
    transcripts_by_id: HashMap<String, TranscriptId>,
    transcripts_by_location: HashMap<(String, String), TranscriptId>,
    chromosomes: BTreeSet<String>,
}

impl Genome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of gene `id`, creating the gene on first use.
    pub fn add_gene(&mut self, id: &str) -> GeneId {
        if let Some(existing) = self.genes_by_id.get(id) {
            return *existing;
        }
        let handle = GeneId(self.genes.len() as u32);
        self.genes.push(Gene {
            id: id.to_string(),
            transcripts: Vec::new(),
        });
        self.loci.push(Vec::new());
        self.genes_by_id.insert(id.to_string(), handle);
        handle
    }

    /// Adds a transcript under `gene`. A trailing `*` stop symbol is dropped from `protein`.
    ///
    /// Exact-id lookups resolve to the first transcript registered under an id, and
    /// [`transcript_on`](Self::transcript_on) to the first one per chromosome.
    pub fn add_transcript(
        &mut self,
        gene: GeneId,
        id: &str,
        chromosome: &str,
        protein: &str,
    ) -> TranscriptId {
        let handle = TranscriptId(self.transcripts.len() as u32);
        self.transcripts.push(Transcript {
            id: id.to_string(),
            chromosome: chromosome.to_string(),
            protein: protein.trim_end_matches('*').to_string(),
            gene,
        });
        self.genes[gene.0 as usize].transcripts.push(handle);
        self.transcripts_by_id.entry(id.to_string()).or_insert(handle);
        self.transcripts_by_location
            .entry((chromosome.to_string(), id.to_string()))
            .or_insert(handle);
        self.chromosomes.insert(chromosome.to_string());
        handle
    }

    pub fn gene(&self, handle: GeneId) -> &Gene {
        &self.genes[handle.0 as usize]
    }

    pub fn transcript(&self, handle: TranscriptId) -> &Transcript {
        &self.transcripts[handle.0 as usize]
    }

    /// Gene owning a transcript.
    pub fn parent(&self, handle: TranscriptId) -> &Gene {
        self.gene(self.transcript(handle).gene)
    }

    pub fn gene_by_id(&self, id: &str) -> Option<GeneId> {
        self.genes_by_id.get(id).copied()
    }

    /// Exact (version-including) transcript id lookup.
    pub fn transcript_by_id(&self, id: &str) -> Option<TranscriptId> {
        self.transcripts_by_id.get(id).copied()
    }

    /// Exact transcript id lookup restricted to one chromosome.
    pub fn transcript_on(&self, chromosome: &str, id: &str) -> Option<TranscriptId> {
        self.transcripts_by_location
            .get(&(chromosome.to_string(), id.to_string()))
            .copied()
    }

    pub fn has_chromosome(&self, name: &str) -> bool {
        self.chromosomes.contains(name)
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn transcript_count(&self) -> usize {
        self.transcripts.len()
    }

    pub fn iter_genes(&self) -> impl Iterator<Item = (GeneId, &Gene)> {
        self.genes
            .iter()
            .enumerate()
            .map(|(i, g)| (GeneId(i as u32), g))
    }

    /// Transcripts in gene order, then in insertion order within each gene.
    pub fn iter_transcripts(&self) -> impl Iterator<Item = (TranscriptId, &Transcript)> {
        self.genes
            .iter()
            .flat_map(|g| g.transcripts.iter())
            .map(|&h| (h, self.transcript(h)))
    }

    pub fn add_locus(&mut self, gene: GeneId, locus: InteractionLocus) {
        self.loci[gene.0 as usize].push(locus);
    }

    pub fn loci(&self, gene: GeneId) -> &[InteractionLocus] {
        &self.loci[gene.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_gene_is_idempotent_per_id() {
        let mut genome = Genome::new();
        let a = genome.add_gene("G1");
        let b = genome.add_gene("G1");
        let c = genome.add_gene("G2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(genome.gene_count(), 2);
    }

    #[test]
    fn transcripts_link_back_to_their_gene() {
        let mut genome = Genome::new();
        let gene = genome.add_gene("ENSG01");
        let tr = genome.add_transcript(gene, "ENST01.3", "1", "MKV*");

        assert_eq!(genome.parent(tr).id, "ENSG01");
        assert_eq!(genome.gene(gene).transcripts(), &[tr]);
        assert_eq!(genome.transcript(tr).protein(), "MKV");
        assert_eq!(genome.transcript(tr).amino_acid_at(1), Some('K'));
        assert_eq!(genome.transcript(tr).amino_acid_at(3), None);
        assert!(genome.has_chromosome("1"));
        assert_eq!(genome.transcript_by_id("ENST01.3"), Some(tr));
        assert_eq!(genome.transcript_by_id("ENST01"), None);
    }

    #[test]
    fn transcript_on_distinguishes_copies_by_chromosome() {
        let mut genome = Genome::new();
        let hap = genome.add_gene("G_HAP");
        let main = genome.add_gene("G");
        let on_hap = genome.add_transcript(hap, "NM_1.1", "chr6_cox_hap2", "MKV");
        let on_main = genome.add_transcript(main, "NM_1.1", "chr6", "MKV");

        assert_eq!(genome.transcript_by_id("NM_1.1"), Some(on_hap));
        assert_eq!(genome.transcript_on("chr6", "NM_1.1"), Some(on_main));
        assert_eq!(genome.transcript_on("chr6_cox_hap2", "NM_1.1"), Some(on_hap));
        assert_eq!(genome.transcript_on("chr7", "NM_1.1"), None);
    }

    #[test]
    fn iter_transcripts_follows_gene_order() {
        let mut genome = Genome::new();
        let g1 = genome.add_gene("G1");
        let g2 = genome.add_gene("G2");
        genome.add_transcript(g2, "T2", "2", "M");
        genome.add_transcript(g1, "T1", "1", "M");

        let ids: Vec<&str> = genome.iter_transcripts().map(|(_, t)| t.id.as_str()).collect();

        assert_eq!(ids, vec!["T1", "T2"]);
    }

    #[test]
    fn loci_are_stored_per_gene() {
        let mut genome = Genome::new();
        let gene = genome.add_gene("G1");
        let other = genome.add_gene("G2");
        let tr = genome.add_transcript(gene, "T1", "1", "MKV");
        genome.add_locus(
            gene,
            InteractionLocus {
                transcript: tr,
                position: 2,
                partner: tr,
                interaction_id: "X:A_2-A_30:T1".to_string(),
                kind: ContactKind::Contact,
            },
        );

        assert_eq!(genome.loci(gene).len(), 1);
        assert!(genome.loci(other).is_empty());
    }
}
