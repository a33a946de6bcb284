use crate::io::context::IoContext;
use crate::io::error::Error;
use crate::model::{
    atom::Atom, chain::Chain, residue::Residue, structure::Structure, types::Point,
};
use std::collections::HashMap;
use std::io::BufRead;

const FORMAT: &str = "PDB";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResKey {
    res_seq: i32,
    i_code: Option<char>,
}

struct TempResidue {
    key: ResKey,
    raw_name: String,
    is_hetatm: bool,
    atoms: Vec<(f64, Atom)>,
}

#[derive(Default)]
struct TempChain {
    residues: Vec<TempResidue>,
    index: HashMap<ResKey, usize>,
}

/// Molecule metadata assembled from `COMPND` and `SOURCE` records.
#[derive(Debug, Default)]
struct Molecule {
    chains: Vec<String>,
    organism_common: Option<String>,
    organism_scientific: Option<String>,
}

/// Reads a PDB-format structure.
///
/// Only the first model is read. When an atom appears under several alternate
/// locations, the copy with the highest occupancy is kept. Residues keep the order in
/// which they first appear in the file.
///
/// # Arguments
///
/// * `reader` - Buffered source of PDB text.
/// * `context` - Residue-name classifier.
///
/// # Returns
///
/// The parsed [`Structure`] including resolution, header id code and per-chain organism
/// metadata when present.
///
/// # Errors
///
/// Returns [`Error::Io`] when the stream fails and [`Error::Parse`] for coordinate
/// records with unreadable numeric fields.
pub fn read<R: BufRead>(reader: R, context: &IoContext) -> Result<Structure, Error> {
    let mut structure = Structure::new();

    let mut chain_order: Vec<String> = Vec::new();
    let mut chain_map: HashMap<String, TempChain> = HashMap::new();
    let mut compnd = String::new();
    let mut source = String::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;
        let record = field(&line, 0, 6);

        match record {
            "HEADER" => {
                let id_code = field(&line, 62, 66);
                if !id_code.is_empty() {
                    structure.id_code = Some(id_code.to_ascii_uppercase());
                }
            }
            "REMARK" if field(&line, 6, 10) == "2" => {
                if let Some(resolution) = parse_resolution(&line) {
                    structure.resolution = Some(resolution);
                }
            }
            "COMPND" => append_continuation(&mut compnd, &line),
            "SOURCE" => append_continuation(&mut source, &line),
            "ATOM" | "HETATM" => parse_atom_record(
                &line,
                line_num,
                record == "HETATM",
                &mut chain_order,
                &mut chain_map,
            )?,
            "ENDMDL" | "END" => break,
            _ => {}
        }
    }

    let molecules = parse_molecules(&compnd, &source);

    for chain_id in chain_order {
        let Some(temp_chain) = chain_map.remove(&chain_id) else {
            continue;
        };
        let mut chain = Chain::new(&chain_id);

        if let Some(molecule) = molecules.iter().find(|m| m.chains.contains(&chain_id)) {
            chain.organism_common = molecule.organism_common.clone();
            chain.organism_scientific = molecule.organism_scientific.clone();
        }

        for temp_res in temp_chain.residues {
            let kind = context.classify_residue(&temp_res.raw_name, temp_res.is_hetatm);
            let mut residue = Residue::new(
                temp_res.key.res_seq,
                temp_res.key.i_code,
                &temp_res.raw_name,
                kind,
            );
            for (_, atom) in temp_res.atoms {
                residue.add_atom(atom);
            }
            chain.add_residue(residue);
        }

        structure.add_chain(chain);
    }

    Ok(structure)
}

/// Column slice that tolerates short lines.
fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn append_continuation(buffer: &mut String, line: &str) {
    let text = line.get(10..).unwrap_or("").trim();
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(text);
}

/// Parses `REMARK   2 RESOLUTION. 1.80 ANGSTROMS.`; `NOT APPLICABLE` yields `None`.
fn parse_resolution(line: &str) -> Option<f64> {
    let text = line.get(10..)?.trim();
    let value = text.strip_prefix("RESOLUTION.")?;
    value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
}

/// Splits `KEY: VALUE;` specifications into `(KEY, VALUE)` pairs.
fn specifications(text: &str) -> impl Iterator<Item = (String, String)> + '_ {
    text.split(';').filter_map(|spec| {
        let (key, value) = spec.split_once(':')?;
        Some((
            key.trim().to_ascii_uppercase(),
            value.trim().to_string(),
        ))
    })
}

fn parse_molecules(compnd: &str, source: &str) -> Vec<Molecule> {
    let mut molecules: HashMap<String, Molecule> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    let mut current: Option<String> = None;
    for (key, value) in specifications(compnd) {
        match key.as_str() {
            "MOL_ID" => {
                if !molecules.contains_key(&value) {
                    order.push(value.clone());
                }
                molecules.entry(value.clone()).or_default();
                current = Some(value);
            }
            "CHAIN" => {
                if let Some(mol) = current.as_ref().and_then(|id| molecules.get_mut(id)) {
                    mol.chains.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|c| !c.is_empty())
                            .map(str::to_string),
                    );
                }
            }
            _ => {}
        }
    }

    current = None;
    for (key, value) in specifications(source) {
        match key.as_str() {
            "MOL_ID" => current = Some(value),
            "ORGANISM_COMMON" | "ORGANISM_SCIENTIFIC" => {
                let Some(mol) = current.as_ref().and_then(|id| molecules.get_mut(id)) else {
                    continue;
                };
                let value = Some(value.to_ascii_uppercase());
                if key == "ORGANISM_COMMON" {
                    mol.organism_common = value;
                } else {
                    mol.organism_scientific = value;
                }
            }
            _ => {}
        }
    }

    order
        .into_iter()
        .filter_map(|id| molecules.remove(&id))
        .collect()
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    is_hetatm: bool,
    chain_order: &mut Vec<String>,
    chain_map: &mut HashMap<String, TempChain>,
) -> Result<(), Error> {
    if line.len() < 54 {
        return Err(Error::parse(FORMAT, None, line_num, "Atom record too short"));
    }

    let atom_name = field(line, 12, 16);
    let res_name = field(line, 17, 20);
    let chain_id = field(line, 21, 22).to_string();

    let res_seq = field(line, 22, 26)
        .parse::<i32>()
        .map_err(|_| Error::parse(FORMAT, None, line_num, "Invalid residue sequence number"))?;
    let i_code = field(line, 26, 27).chars().next();

    let coord = |start: usize, axis: &str| {
        field(line, start, start + 8)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                Error::parse(FORMAT, None, line_num, format!("Invalid {} coordinate", axis))
            })
    };
    let pos = Point::new(coord(30, "X")?, coord(38, "Y")?, coord(46, "Z")?);

    let occupancy = field(line, 54, 60).parse::<f64>().unwrap_or(1.0);

    let temp_chain = chain_map.entry(chain_id.clone()).or_insert_with(|| {
        chain_order.push(chain_id.clone());
        TempChain::default()
    });

    let key = ResKey { res_seq, i_code };
    let slot = match temp_chain.index.get(&key) {
        Some(&slot) => slot,
        None => {
            temp_chain.residues.push(TempResidue {
                key: key.clone(),
                raw_name: res_name.to_string(),
                is_hetatm,
                atoms: Vec::new(),
            });
            temp_chain.index.insert(key, temp_chain.residues.len() - 1);
            temp_chain.residues.len() - 1
        }
    };
    let temp_res = &mut temp_chain.residues[slot];

    match temp_res.atoms.iter_mut().find(|(_, a)| a.name == atom_name) {
        Some(existing) => {
            if occupancy > existing.0 {
                *existing = (occupancy, Atom::new(atom_name, pos));
            }
        }
        None => temp_res.atoms.push((occupancy, Atom::new(atom_name, pos))),
    }

    Ok(())
}
