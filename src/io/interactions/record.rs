//! Line encoding of [`DistanceRecord`]s.
//!
//! One record per line, eleven tab-separated fields:
//!
//! ```text
//! interaction_id  kind  distance  chr1  tr_id1  pos1  aa1  chr2  tr_id2  pos2  aa2
//! ```

use crate::model::record::{ContactKind, DistanceRecord, ResidueSite};

pub const FIELD_COUNT: usize = 11;

/// Renders a record as one line, without the trailing newline.
///
/// Distances use the shortest representation that parses back to the same `f64`.
pub fn encode(record: &DistanceRecord) -> String {
    let s1 = &record.site1;
    let s2 = &record.site2;
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        record.interaction_id,
        record.kind,
        record.distance,
        s1.chromosome,
        s1.transcript_id,
        s1.position,
        s1.amino_acid,
        s2.chromosome,
        s2.transcript_id,
        s2.position,
        s2.amino_acid
    )
}

/// Parses one encoded line.
///
/// # Errors
///
/// Returns a description of the first malformed field.
pub fn decode(line: &str) -> Result<DistanceRecord, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "Expected {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        ));
    }
    if fields[0].is_empty() {
        return Err("Empty interaction id".to_string());
    }

    let kind = fields[1].parse::<ContactKind>()?;
    let distance = fields[2]
        .parse::<f64>()
        .map_err(|_| format!("Invalid distance '{}'", fields[2]))?;

    Ok(DistanceRecord {
        interaction_id: fields[0].to_string(),
        kind,
        distance,
        site1: decode_site(&fields[3..7])?,
        site2: decode_site(&fields[7..11])?,
    })
}

fn decode_site(fields: &[&str]) -> Result<ResidueSite, String> {
    let position = fields[2]
        .parse::<usize>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| format!("Invalid position '{}'", fields[2]))?;

    let mut letters = fields[3].chars();
    let amino_acid = match (letters.next(), letters.next()) {
        (Some(aa), None) => aa,
        _ => return Err(format!("Invalid amino acid '{}'", fields[3])),
    };

    Ok(ResidueSite {
        chromosome: fields[0].to_string(),
        transcript_id: fields[1].to_string(),
        position,
        amino_acid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(position: usize, amino_acid: char) -> ResidueSite {
        ResidueSite {
            chromosome: "1".to_string(),
            transcript_id: "NM_001269.4".to_string(),
            position,
            amino_acid,
        }
    }

    fn record(distance: f64) -> DistanceRecord {
        DistanceRecord {
            interaction_id: "1A12:A_25-A_136:NM_001269.4".to_string(),
            kind: ContactKind::Contact,
            distance,
            site1: site(25, 'K'),
            site2: site(136, 'E'),
        }
    }

    #[test]
    fn encode_lays_out_eleven_tab_separated_fields() {
        let line = encode(&record(2.75));

        assert_eq!(
            line,
            "1A12:A_25-A_136:NM_001269.4\tcontact\t2.75\t1\tNM_001269.4\t25\tK\t1\tNM_001269.4\t136\tE"
        );
    }

    #[test]
    fn decode_restores_distance_exactly() {
        let original = record(2.8284271247461903);

        let decoded = decode(&encode(&original)).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(decoded.distance.to_bits(), original.distance.to_bits());
    }

    #[test]
    fn decode_reads_non_contact_kind() {
        let line = "X:A_1-A_30:T\tnon_contact\t12.5\t2\tT\t1\tM\t2\tT\t30\tW";

        let decoded = decode(line).unwrap();

        assert_eq!(decoded.kind, ContactKind::NonContact);
        assert_eq!(decoded.site2.position, 30);
        assert_eq!(decoded.site2.amino_acid, 'W');
    }

    #[test]
    fn decode_rejects_wrong_field_count() {
        let err = decode("X\tcontact\t1.0").unwrap_err();

        assert!(err.contains("Expected 11 fields, found 3"));
    }

    #[test]
    fn decode_rejects_malformed_fields() {
        let base = ["X", "contact", "1.0", "1", "T", "1", "M", "1", "T", "30", "W"];
        let with = |idx: usize, value: &'static str| {
            let mut fields = base;
            fields[idx] = value;
            fields.join("\t")
        };

        assert!(decode(&with(1, "bonded")).is_err());
        assert!(decode(&with(2, "far")).is_err());
        assert!(decode(&with(5, "0")).is_err());
        assert!(decode(&with(9, "-3")).is_err());
        assert!(decode(&with(6, "MK")).is_err());
        assert!(decode(&with(0, "")).is_err());
        assert!(decode(&base.join("\t")).is_ok());
    }
}
