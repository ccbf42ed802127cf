use std::{
    fs,
    path::{Path, PathBuf},
};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    disc::boundary::BoundaryCondition,
    error::{FemError, Result},
    media::{Elastic, EqFluidJca, FemMedium, Fluid, Medium, Pem},
    solver::SolverConfig,
};

/// Material parameters as written in a JSON descriptor, selected by its
/// `medium_type` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "medium_type", rename_all = "lowercase")]
pub enum MaterialDescriptor {
    Fluid(Fluid),
    Eqf(EqFluidJca),
    Pem(Pem),
    Elastic(Elastic),
}
impl From<MaterialDescriptor> for Medium {
    fn from(descriptor: MaterialDescriptor) -> Self {
        match descriptor {
            MaterialDescriptor::Fluid(fluid) => Medium::Fluid(fluid),
            MaterialDescriptor::Eqf(eqf) => Medium::EqFluid(eqf),
            MaterialDescriptor::Pem(pem) => Medium::Pem(pem),
            MaterialDescriptor::Elastic(elastic) => Medium::Elastic(elastic),
        }
    }
}
impl MaterialDescriptor {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let content = fs::read_to_string(file_path)
            .map_err(|err| FemError::IoMissing(format!("{}: {err}", file_path.display())))?;
        Self::parse(&content)
    }
}

/// Where the parameters of a medium come from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawMaterialSpec")]
pub enum MaterialSpec {
    /// The built-in reference air.
    Air,
    Descriptor(MaterialDescriptor),
    /// A JSON descriptor file.
    File(PathBuf),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMaterialSpec {
    Name(String),
    Descriptor(MaterialDescriptor),
}
impl From<RawMaterialSpec> for MaterialSpec {
    fn from(raw: RawMaterialSpec) -> Self {
        match raw {
            RawMaterialSpec::Name(name) => MaterialSpec::from(name.as_str()),
            RawMaterialSpec::Descriptor(descriptor) => MaterialSpec::Descriptor(descriptor),
        }
    }
}
impl From<&str> for MaterialSpec {
    fn from(name: &str) -> Self {
        if name.eq_ignore_ascii_case("air") {
            MaterialSpec::Air
        } else {
            MaterialSpec::File(PathBuf::from(name))
        }
    }
}
impl From<MaterialDescriptor> for MaterialSpec {
    fn from(descriptor: MaterialDescriptor) -> Self {
        MaterialSpec::Descriptor(descriptor)
    }
}

impl MaterialSpec {
    pub fn resolve(&self) -> Result<FemMedium> {
        let medium = match self {
            MaterialSpec::Air => Medium::air(),
            MaterialSpec::Descriptor(descriptor) => Medium::from(descriptor.clone()),
            MaterialSpec::File(file_path) => Medium::from(MaterialDescriptor::from_file(file_path)?),
        };
        FemMedium::new(medium)
    }
}

/// What a mesh label stands for: a medium for the elements carrying it, a
/// condition for the edges carrying it, or both.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelDefinition {
    #[serde(default)]
    pub medium: Option<MaterialSpec>,
    #[serde(default)]
    pub boundary: Option<BoundaryCondition>,
}
impl LabelDefinition {
    pub fn medium(spec: impl Into<MaterialSpec>) -> Self {
        Self {
            medium: Some(spec.into()),
            boundary: None,
        }
    }
    pub fn boundary(condition: BoundaryCondition) -> Self {
        Self {
            medium: None,
            boundary: Some(condition),
        }
    }
}

/// Problem file: label definitions plus solver settings.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ModelParamParser {
    pub labels: HashMap<i32, LabelDefinition>,
    #[serde(default)]
    pub solver: SolverConfig,
}
impl ModelParamParser {
    pub fn parse(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        let file_content = fs::read_to_string(file_path)
            .map_err(|err| FemError::IoMissing(format!("{}: {err}", file_path.display())))?;
        let param: ModelParamParser = serde_json::from_str(&file_content)?;
        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::strategy::LinearSolverKind;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FOAM: &str = r#"{
        "medium_type": "eqf",
        "phi": 0.9,
        "sigma": 10000.0,
        "alpha": 1.1,
        "lambda_prime": 100e-6,
        "lambda": 100e-6
    }"#;

    #[test]
    fn test_descriptor_parsing() {
        let descriptor = MaterialDescriptor::parse(FOAM).unwrap();
        let MaterialDescriptor::Eqf(eqf) = &descriptor else {
            panic!("expected an equivalent fluid, got {descriptor:?}");
        };
        assert_eq!(eqf.sigma, 10000.0);
        let pem = MaterialDescriptor::parse(
            r#"{"medium_type": "pem", "phi": 0.99, "sigma": 9045.0, "alpha": 1.02,
                "lambda_prime": 197e-6, "lambda": 103e-6, "rho_1": 8.43, "nu": 0.42,
                "E": 194.9e3, "eta": 0.05, "loss_type": "structural"}"#,
        )
        .unwrap();
        assert!(matches!(pem, MaterialDescriptor::Pem(_)));
    }

    #[test]
    fn test_capitalized_length_keys() {
        // characteristic lengths spelled Lambda / Lambda_prime, and an eqf
        // descriptor carrying unused frame parameters
        let descriptor = MaterialDescriptor::parse(
            r#"{"medium_type": "eqf", "phi": 0.99, "sigma": 9045.0, "alpha": 1.02,
                "Lambda_prime": 197e-6, "Lambda": 103e-6, "rho_1": 8.43, "nu": 0.42,
                "E": 194.9e3, "eta": 0.05}"#,
        )
        .unwrap();
        let MaterialDescriptor::Eqf(eqf) = &descriptor else {
            panic!("expected an equivalent fluid, got {descriptor:?}");
        };
        assert_relative_eq!(eqf.lambda_prime, 197e-6, max_relative = 1e-12);
        assert_relative_eq!(eqf.lambda, 103e-6, max_relative = 1e-12);
        assert!(eqf.e.is_some() && eqf.eta.is_some());
        assert!(Medium::from(descriptor.clone()).validate().is_ok());

        let descriptor = MaterialDescriptor::parse(
            r#"{"medium_type": "pem", "phi": 0.99, "sigma": 9045.0, "alpha": 1.02,
                "Lambda_prime": 197e-6, "Lambda": 103e-6, "rho_1": 8.43, "nu": 0.42,
                "E": 194.9e3, "eta": 0.05, "loss_type": "structural"}"#,
        )
        .unwrap();
        let MaterialDescriptor::Pem(pem) = &descriptor else {
            panic!("expected a poroelastic material, got {descriptor:?}");
        };
        assert_relative_eq!(pem.lambda, 103e-6, max_relative = 1e-12);

        let bad_frame = FOAM.replace("\"lambda\": 100e-6", "\"lambda\": 100e-6, \"nu\": 0.7");
        let descriptor = MaterialDescriptor::parse(&bad_frame).unwrap();
        assert!(matches!(
            Medium::from(descriptor).validate(),
            Err(FemError::Schema(_))
        ));
    }

    #[test]
    fn test_descriptor_schema_errors() {
        let unknown = FOAM.replace("\"sigma\"", "\"sigma_bis\"");
        assert!(matches!(
            MaterialDescriptor::parse(&unknown),
            Err(FemError::Schema(_))
        ));
        let missing = r#"{"medium_type": "fluid", "rho": 1.2}"#;
        assert!(matches!(
            MaterialDescriptor::parse(missing),
            Err(FemError::Schema(_))
        ));
        let unknown_type = r#"{"medium_type": "plasma", "rho": 1.2, "c": 340.0}"#;
        assert!(matches!(
            MaterialDescriptor::parse(unknown_type),
            Err(FemError::Schema(_))
        ));
    }

    #[test]
    fn test_material_spec_resolution() {
        assert_eq!(MaterialSpec::from("AIR"), MaterialSpec::Air);
        assert!(MaterialSpec::Air.resolve().is_ok());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FOAM.as_bytes()).unwrap();
        let spec = MaterialSpec::File(file.path().to_path_buf());
        let medium = spec.resolve().unwrap();
        assert_eq!(medium.medium.kind(), "eqf");

        let missing = MaterialSpec::from("/definitely/not/here/foam.json");
        assert!(matches!(missing.resolve(), Err(FemError::IoMissing(_))));
    }

    #[test]
    fn test_model_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "labels": {{
                    "0": {{"medium": "air"}},
                    "5": {{"medium": {FOAM}}},
                    "2": {{"boundary": {{"type": "impedance", "amplitude": 0.5}}}}
                }},
                "solver": {{"backend": "dense_lu"}}
            }}"#
        )
        .unwrap();
        let model = ModelParamParser::parse(file.path()).unwrap();
        assert_eq!(model.labels.len(), 3);
        assert_eq!(model.labels[&0].medium, Some(MaterialSpec::Air));
        assert!(matches!(
            model.labels[&5].medium,
            Some(MaterialSpec::Descriptor(MaterialDescriptor::Eqf(_)))
        ));
        assert_eq!(
            model.labels[&2].boundary,
            Some(BoundaryCondition::Impedance { amplitude: 0.5 })
        );
        assert_eq!(model.solver.backend, LinearSolverKind::DenseLu);
    }

    #[test]
    fn test_missing_model_file() {
        assert!(matches!(
            ModelParamParser::parse("/definitely/not/here/model.json"),
            Err(FemError::IoMissing(_))
        ));
    }
}
