//! # PDB 格式解析器
//!
//! 解析 Protein Data Bank 固定列格式的 ATOM/HETATM 记录。
//!
//! ## PDB 列定义（从 1 开始）
//! ```text
//! 1-6    Record name  "ATOM  " / "HETATM"
//! 13-16  Atom name
//! 18-20  Residue name
//! 22     Chain identifier
//! 31-38  x (Å)
//! 39-46  y (Å)
//! 47-54  z (Å)
//! 77-78  Element symbol
//! ```
//!
//! 多模型文件只读取第一个 MODEL（遇到 ENDMDL 即停止）。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{DockviewError, Result};
use crate::models::{Atom, Molecule, StructureFormat};

/// 从字符串内容解析 PDB 格式
pub fn parse_pdb_content(content: &str, default_name: &str) -> Result<Molecule> {
    let mut name = default_name.to_string();
    let mut atoms: Vec<Atom> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let record = line.get(0..6).unwrap_or(line).trim_end();

        match record {
            "ATOM" | "HETATM" => {
                let atom = parse_atom_line(line).ok_or_else(|| DockviewError::ParseError {
                    format: "pdb".to_string(),
                    path: name.clone(),
                    reason: format!("Invalid coordinates at line {}", idx + 1),
                })?;
                atoms.push(atom);
            }
            "HEADER" => {
                if let Some(id) = line.get(62..66).map(str::trim).filter(|s| !s.is_empty()) {
                    name = id.to_string();
                }
            }
            "ENDMDL" | "END" => break,
            _ => {}
        }
    }

    if atoms.is_empty() {
        return Err(DockviewError::ParseError {
            format: "pdb".to_string(),
            path: name,
            reason: "No ATOM/HETATM records".to_string(),
        });
    }

    Ok(Molecule::new(name, StructureFormat::Pdb, atoms))
}

/// 解析单行 ATOM/HETATM 记录，坐标缺失时返回 None
fn parse_atom_line(line: &str) -> Option<Atom> {
    let column = |start: usize, end: usize| -> Option<&str> {
        line.get(start..end.min(line.len())).map(str::trim)
    };

    let x: f64 = column(30, 38)?.parse().ok()?;
    let y: f64 = column(38, 46)?.parse().ok()?;
    let z: f64 = column(46, 54)?.parse().ok()?;

    let atom_name = column(12, 16).unwrap_or("").to_string();
    let residue = column(17, 20).unwrap_or("").to_string();
    let chain = line.get(21..22).and_then(|s| s.chars().next()).filter(|c| *c != ' ');

    let element = column(76, 78)
        .filter(|s| !s.is_empty())
        .map(normalize_element)
        .unwrap_or_else(|| element_from_atom_name(&atom_name));

    let mut atom = Atom::new(element, [x, y, z]).with_name(atom_name);
    if !residue.is_empty() {
        atom = atom.with_residue(residue, chain);
    }
    atom.hetero = line.starts_with("HETATM");

    Some(atom)
}

/// "CL" -> "Cl"
fn normalize_element(symbol: &str) -> String {
    symbol
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// 元素列缺失时，取原子名的第一个字母
fn element_from_atom_name(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| "X".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRAMBIN_FRAGMENT: &str = "\
HEADER    PLANT PROTEIN                           30-APR-81   1CRN
ATOM      1  N   THR A   1      17.047  14.099   3.625  1.00 13.79           N
ATOM      2  CA  THR A   1      16.967  12.784   4.338  1.00 10.80           C
ATOM      3  C   THR A   1      15.685  12.755   5.133  1.00  9.19           C
HETATM    4  O   HOH A 101      10.000  10.000  10.000  1.00 20.00           O
END
";

    #[test]
    fn test_parse_pdb_atoms() {
        let mol = parse_pdb_content(CRAMBIN_FRAGMENT, "protein").unwrap();
        assert_eq!(mol.name, "1CRN");
        assert_eq!(mol.atoms.len(), 4);
        assert_eq!(mol.atoms[1].name, "CA");
        assert_eq!(mol.atoms[1].element, "C");
        assert_eq!(mol.atoms[1].residue.as_deref(), Some("THR"));
        assert_eq!(mol.atoms[1].chain, Some('A'));
        assert!(!mol.atoms[0].hetero);
        assert!(mol.atoms[3].hetero);
        assert!((mol.atoms[0].position[0] - 17.047).abs() < 1e-9);
        assert!(mol.has_polymer());
    }

    #[test]
    fn test_parse_pdb_first_model_only() {
        let content = "\
MODEL        1
ATOM      1  CA  ALA A   1       1.000   2.000   3.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  ALA A   1      9.000   9.000   9.000  1.00  0.00           C
ENDMDL
";
        let mol = parse_pdb_content(content, "multi").unwrap();
        assert_eq!(mol.atoms.len(), 1);
        assert!((mol.atoms[0].position[2] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_pdb_without_element_column() {
        let content = "ATOM      1  CA  GLY A   1       0.000   0.000   0.000\n";
        let mol = parse_pdb_content(content, "short").unwrap();
        assert_eq!(mol.atoms[0].element, "C");
        assert_eq!(mol.name, "short");
    }

    #[test]
    fn test_parse_pdb_empty() {
        let err = parse_pdb_content("REMARK nothing here\n", "empty").unwrap_err();
        assert!(matches!(err, DockviewError::ParseError { .. }));
    }

    #[test]
    fn test_parse_pdb_bad_coordinates() {
        let content = "ATOM      1  CA  GLY A   1       abc     0.000   0.000\n";
        assert!(parse_pdb_content(content, "bad").is_err());
    }

    #[test]
    fn test_normalize_element() {
        assert_eq!(normalize_element("CL"), "Cl");
        assert_eq!(normalize_element("n"), "N");
    }
}
