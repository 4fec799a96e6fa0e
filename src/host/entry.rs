//! Host-callable entry points.
//!
//! Each function takes the raw argument list, checks its arity before
//! anything else, coerces the arguments and hands over to [`MeshBridge`].

use std::path::PathBuf;

use crate::bridge::MeshBridge;
use crate::data::pet::PetMesh;
use crate::host::value::HostValue;
use crate::mesh_error::MeshBridgeError;

/// File name used by [`call_write`] when none is given.
pub const DEFAULT_MESH_NAME: &str = "mesh";

fn check_arity(args: &[HostValue], min: usize, max: usize) -> Result<(), MeshBridgeError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(MeshBridgeError::ArgumentCount {
            min,
            max,
            found: args.len(),
        })
    }
}

/// `refine(mesh [, cells])`: refine every cell, or the listed 1-based cells.
///
/// # Errors
/// [`MeshBridgeError::ArgumentCount`] outside 1..=2 arguments,
/// [`MeshBridgeError::TypeCoercion`] for arguments of the wrong kind, and
/// everything [`MeshBridge::refine`] reports.
pub fn call_refine(bridge: &MeshBridge, args: &[HostValue]) -> Result<HostValue, MeshBridgeError> {
    check_arity(args, 1, 2)?;
    let mesh = PetMesh::try_from(&args[0])?;
    let cells = args.get(1).map(|v| v.as_integers("cells")).transpose()?;
    let refined = bridge.refine(&mesh, cells.as_deref())?;
    Ok(HostValue::from(&refined))
}

/// `read(path)`: load a mesh file as a `(p, e, t)` record.
///
/// # Errors
/// [`MeshBridgeError::ArgumentCount`] unless exactly one argument is given,
/// [`MeshBridgeError::TypeCoercion`] if it is not text, and everything
/// [`MeshBridge::read`] reports.
pub fn call_read(bridge: &MeshBridge, args: &[HostValue]) -> Result<HostValue, MeshBridgeError> {
    check_arity(args, 1, 1)?;
    let path = args[0].as_text("path")?;
    let mesh = bridge.read(path)?;
    Ok(HostValue::from(&mesh))
}

/// `write(mesh [, name])`: save the mesh to `<name>.xml` (default
/// `mesh.xml`), returning the path written.
///
/// # Errors
/// [`MeshBridgeError::ArgumentCount`] outside 1..=2 arguments,
/// [`MeshBridgeError::TypeCoercion`] for arguments of the wrong kind, and
/// everything [`MeshBridge::write`] reports.
pub fn call_write(bridge: &MeshBridge, args: &[HostValue]) -> Result<PathBuf, MeshBridgeError> {
    check_arity(args, 1, 2)?;
    let mesh = PetMesh::try_from(&args[0])?;
    let name = args
        .get(1)
        .map(|v| v.as_text("name"))
        .transpose()?
        .unwrap_or(DEFAULT_MESH_NAME);
    let path = PathBuf::from(format!("{name}.xml"));
    bridge.write(&mesh, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::structured_mesh_2d;

    fn square() -> HostValue {
        let pet = structured_mesh_2d(&[0.0, 1.0], &[0.0, 1.0], 1, [1, 2, 3, 4]).unwrap();
        HostValue::from(&pet)
    }

    #[test]
    fn arity_is_checked_first() {
        let bridge = MeshBridge::default();
        let junk = HostValue::Text("junk".into());
        assert_eq!(
            call_refine(&bridge, &[]).unwrap_err(),
            MeshBridgeError::ArgumentCount { min: 1, max: 2, found: 0 }
        );
        assert_eq!(
            call_refine(&bridge, &[junk.clone(), junk.clone(), junk.clone()]).unwrap_err(),
            MeshBridgeError::ArgumentCount { min: 1, max: 2, found: 3 }
        );
        assert_eq!(
            call_read(&bridge, &[junk.clone(), junk.clone()]).unwrap_err(),
            MeshBridgeError::ArgumentCount { min: 1, max: 1, found: 2 }
        );
        assert_eq!(
            call_write(&bridge, &[]).unwrap_err(),
            MeshBridgeError::ArgumentCount { min: 1, max: 2, found: 0 }
        );
    }

    #[test]
    fn refine_returns_a_record() {
        let bridge = MeshBridge::default();
        let out = call_refine(&bridge, &[square(), HostValue::row_vector(&[1.0])]).unwrap();
        let pet = PetMesh::try_from(&out).unwrap();
        assert_eq!(pet.num_cells(), 4);
        assert_eq!(pet.num_vertices(), 5);
    }

    #[test]
    fn arguments_of_the_wrong_kind_are_coercion_errors() {
        let bridge = MeshBridge::default();
        assert!(matches!(
            call_refine(&bridge, &[square(), HostValue::Text("all".into())]),
            Err(MeshBridgeError::TypeCoercion { .. })
        ));
        assert!(matches!(
            call_read(&bridge, &[HostValue::row_vector(&[1.0])]),
            Err(MeshBridgeError::TypeCoercion { .. })
        ));
        assert!(matches!(
            call_write(&bridge, &[square(), HostValue::row_vector(&[1.0])]),
            Err(MeshBridgeError::TypeCoercion { .. })
        ));
    }
}
