use {
    crate::Error,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
        json_abi::JsonAbi,
        primitives::{Bytes, hex},
    },
    serde::Deserialize,
};

/// Compiled interface and creation bytecode of a single contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractArtifact {
    pub name: String,
    /// `path/to/Source.sol:Name` when the artifact came from a build output
    /// directory.
    pub qualified_name: Option<String>,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// On-disk artifact format. Hardhat stores the creation bytecode as a hex
/// string, Foundry nests it in an object next to its source map.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn as_hex(&self) -> &str {
        match self {
            Self::Hex(hex) => hex,
            Self::Object { object } => object,
        }
    }
}

impl ContractArtifact {
    pub fn new(name: impl Into<String>, abi: JsonAbi, bytecode: Bytes) -> Self {
        Self {
            name: name.into(),
            qualified_name: None,
            abi,
            bytecode,
        }
    }

    /// Parses a Hardhat or Foundry artifact. `name` is used when the JSON does
    /// not carry a contract name itself (Foundry).
    pub fn from_json(name: &str, json: &str) -> Result<Self, Error> {
        let raw: RawArtifact = serde_json::from_str(json).map_err(|err| Error::Invalid {
            location: name.to_string(),
            reason: err.to_string(),
        })?;
        let name = raw.contract_name.unwrap_or_else(|| name.to_string());
        let bytecode = parse_bytecode(&name, raw.bytecode.as_hex())?;

        Ok(Self {
            name,
            qualified_name: None,
            abi: raw.abi,
            bytecode,
        })
    }

    /// ABI-encodes constructor arguments given in their string form, e.g.
    /// `"0x5FbDB2315678afecb367f032d93F642f64180aa3"` for an `address` or
    /// `"1000"` for a `uint256`.
    pub fn encode_constructor_args(&self, args: &[String]) -> Result<Bytes, Error> {
        let invalid = |reason: String| Error::ConstructorArgs {
            contract: self.name.clone(),
            reason,
        };

        let Some(constructor) = &self.abi.constructor else {
            if args.is_empty() {
                return Ok(Bytes::new());
            }
            return Err(invalid(format!(
                "contract has no constructor but {} argument(s) were given",
                args.len()
            )));
        };
        if constructor.inputs.len() != args.len() {
            return Err(invalid(format!(
                "expected {} argument(s), got {}",
                constructor.inputs.len(),
                args.len()
            )));
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty = param
                    .resolve()
                    .map_err(|err| invalid(format!("parameter {:?}: {err}", param.name)))?;
                ty.coerce_str(arg)
                    .map_err(|err| invalid(format!("parameter {:?}: {err}", param.name)))
            })
            .collect::<Result<Vec<DynSolValue>, _>>()?;

        constructor
            .abi_encode_input(&values)
            .map(Bytes::from)
            .map_err(|err| invalid(err.to_string()))
    }

    /// Creation transaction input: bytecode followed by the encoded
    /// constructor arguments.
    pub fn deploy_code(&self, encoded_args: &[u8]) -> Bytes {
        [&self.bytecode[..], encoded_args].concat().into()
    }
}

fn parse_bytecode(name: &str, code: &str) -> Result<Bytes, Error> {
    let code = code.strip_prefix("0x").unwrap_or(code);
    if code.is_empty() {
        return Err(Error::NotDeployable(name.to_string()));
    }
    // Link placeholders look like `__$<34 hex chars>$__`.
    if code.contains("__") {
        return Err(Error::UnlinkedLibrary(name.to_string()));
    }
    hex::decode(code)
        .map(Bytes::from)
        .map_err(|err| Error::Invalid {
            location: name.to_string(),
            reason: format!("bytecode is not valid hex: {err}"),
        })
}
