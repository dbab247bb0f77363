//! # SDF / MOL 格式解析器
//!
//! 解析 MDL V2000 分子文件。多记录 SDF（每个姿势一条记录）只读取第一条，
//! 即第一个 `$$$$` 之前的内容。
//!
//! ## V2000 格式说明
//! ```text
//! name                     # header line 1
//! program / timestamp      # header line 2
//! comment                  # header line 3
//! aaabbb...   V2000        # counts line: atoms, bonds
//! x y z Symbol ...         # atom block
//! 111222ttt...             # bond block (fixed 3-char columns)
//! M  END
//! > <minimizedAffinity>    # optional data fields
//! -7.25
//!
//! $$$$
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{DockviewError, Result};
use crate::models::{Atom, Bond, Molecule, StructureFormat};

/// 从字符串内容解析 SDF 的第一条记录
pub fn parse_sdf_content(content: &str, default_name: &str) -> Result<Molecule> {
    let lines: Vec<&str> = content
        .lines()
        .take_while(|l| l.trim_end() != "$$$$")
        .collect();

    let parse_err = |reason: String| DockviewError::ParseError {
        format: "sdf".to_string(),
        path: default_name.to_string(),
        reason,
    };

    if lines.len() < 4 {
        return Err(parse_err("File too short".to_string()));
    }

    let name = lines[0].trim();
    let name = if name.is_empty() { default_name } else { name };

    // Line 3: counts line
    let counts = lines[3];
    if counts.contains("V3000") {
        return Err(parse_err("V3000 molfiles are not supported".to_string()));
    }
    let n_atoms = fixed_usize(counts, 0)
        .ok_or_else(|| parse_err("Invalid atom count in counts line".to_string()))?;
    let n_bonds = fixed_usize(counts, 3).unwrap_or(0);

    if lines.len() < 4 + n_atoms {
        return Err(parse_err(format!(
            "Expected {} atom lines, found {}",
            n_atoms,
            lines.len() - 4
        )));
    }

    // Atom block
    let mut atoms = Vec::with_capacity(n_atoms);
    for (i, line) in lines[4..4 + n_atoms].iter().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(parse_err(format!("Invalid atom line {}", i + 5)));
        }
        let coords: Vec<f64> = parts[..3].iter().filter_map(|s| s.parse().ok()).collect();
        if coords.len() < 3 {
            return Err(parse_err(format!("Invalid coordinates at line {}", i + 5)));
        }
        let mut atom = Atom::new(parts[3], [coords[0], coords[1], coords[2]]);
        atom.hetero = true;
        atoms.push(atom);
    }

    // Bond block
    let bond_start = 4 + n_atoms;
    let bond_end = (bond_start + n_bonds).min(lines.len());
    let mut bonds = Vec::with_capacity(n_bonds);
    for line in &lines[bond_start..bond_end] {
        let (Some(a), Some(b)) = (fixed_usize(line, 0), fixed_usize(line, 3)) else {
            continue;
        };
        if a == 0 || b == 0 || a > n_atoms || b > n_atoms {
            continue;
        }
        let order = fixed_usize(line, 6).unwrap_or(1).min(u8::MAX as usize) as u8;
        bonds.push(Bond {
            from: a - 1,
            to: b - 1,
            order,
        });
    }

    let mut molecule = Molecule::new(name, StructureFormat::Sdf, atoms);
    molecule.bonds = bonds;

    // Data fields after "M  END"
    if let Some(end) = lines.iter().position(|l| l.starts_with("M  END")) {
        let mut key: Option<String> = None;
        let mut value: Vec<&str> = Vec::new();

        for line in &lines[end + 1..] {
            if line.starts_with('>') {
                if let Some(k) = key.take() {
                    molecule.properties.insert(k, value.join("\n"));
                }
                value.clear();
                key = data_field_name(line);
            } else if line.trim().is_empty() {
                if let Some(k) = key.take() {
                    molecule.properties.insert(k, value.join("\n"));
                }
                value.clear();
            } else if key.is_some() {
                value.push(line.trim());
            }
        }

        if let Some(k) = key {
            molecule.properties.insert(k, value.join("\n"));
        }
    }

    Ok(molecule)
}

/// 读取 3 字符宽的定宽整数列
fn fixed_usize(line: &str, start: usize) -> Option<usize> {
    let end = (start + 3).min(line.len());
    line.get(start..end)?.trim().parse().ok()
}

/// `> <minimizedAffinity>` -> "minimizedAffinity"
fn data_field_name(line: &str) -> Option<String> {
    let open = line.find('<')?;
    let close = line[open + 1..].find('>')? + open + 1;
    Some(line[open + 1..close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETHANOL_POSES: &str = "\
ethanol
  RDKit          3D

  3  2  0  0  0  0  0  0  0  0999 V2000
    1.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    2.0000    1.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    3.0000    2.0000    3.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
> <confidence>
-1.77

> <note>
first pose

$$$$
ethanol
  RDKit          3D

  1  0  0  0  0  0  0  0  0  0999 V2000
   50.0000   50.0000   50.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
M  END
$$$$
";

    #[test]
    fn test_parse_sdf_first_record() {
        let mol = parse_sdf_content(ETHANOL_POSES, "pose").unwrap();
        assert_eq!(mol.name, "ethanol");
        assert_eq!(mol.atoms.len(), 3);
        assert_eq!(mol.atoms[2].element, "O");
        assert_eq!(mol.bonds.len(), 2);
        assert_eq!(mol.bonds[1], Bond { from: 1, to: 2, order: 1 });

        let c = mol.centroid().unwrap();
        assert!((c[0] - 2.0).abs() < 1e-9);
        assert!((c[1] - 1.0).abs() < 1e-9);
        assert!((c[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_sdf_properties() {
        let mol = parse_sdf_content(ETHANOL_POSES, "pose").unwrap();
        assert_eq!(mol.properties.get("confidence").map(String::as_str), Some("-1.77"));
        assert_eq!(mol.properties.get("note").map(String::as_str), Some("first pose"));
    }

    #[test]
    fn test_parse_sdf_blank_name_uses_default() {
        let content = "\n\n\n  1  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 N   0  0\nM  END\n";
        let mol = parse_sdf_content(content, "rank2_confidence-0.05").unwrap();
        assert_eq!(mol.name, "rank2_confidence-0.05");
        assert_eq!(mol.atoms.len(), 1);
    }

    #[test]
    fn test_parse_sdf_truncated_atom_block() {
        let content = "x\n\n\n  5  0  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C\n";
        assert!(parse_sdf_content(content, "x").is_err());
    }

    #[test]
    fn test_parse_sdf_v3000_rejected() {
        let content = "x\n\n\n  0  0  0     0  0            999 V3000\nM  END\n";
        let err = parse_sdf_content(content, "x").unwrap_err();
        assert!(err.to_string().contains("sdf"));
    }
}
