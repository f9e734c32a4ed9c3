//! Formatting utilities

use glam::{Quat, Vec3};

/// Format a vector with fixed precision
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format a rotation as `x y z w`
pub fn format_quat(q: Quat) -> String {
    format!("({:.3}, {:.3}, {:.3}, {:.3})", q.x, q.y, q.z, q.w)
}

/// Format four consecutive floats of a row-major matrix
pub fn format_row(row: &[f32]) -> String {
    row.iter()
        .map(|value| format!("{value:>9.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an optional parent index, `-` for roots
pub fn format_parent(parent: Option<usize>) -> String {
    parent.map_or_else(|| "-".to_string(), |p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vec3() {
        assert_eq!(format_vec3(Vec3::new(1.0, -0.5, 0.0)), "(1.000, -0.500, 0.000)");
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&[1.0, 0.0]), "   1.0000    0.0000");
    }

    #[test]
    fn test_format_parent() {
        assert_eq!(format_parent(None), "-");
        assert_eq!(format_parent(Some(3)), "3");
    }
}
