use std::fmt::{self, Display, Formatter};

/// A single contract to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Short or fully qualified contract name as known to the artifact
    /// registry.
    pub name: String,
    /// Constructor arguments in their string form, coerced against the
    /// contract's ABI right before deployment.
    pub args: Vec<String>,
}

impl Request {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl From<configs::Contract> for Request {
    fn from(contract: configs::Contract) -> Self {
        Self {
            name: contract.name,
            args: contract.args,
        }
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Contracts to deploy, in the exact order they get deployed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan(Vec<Request>);

impl Plan {
    pub fn new(requests: Vec<Request>) -> Self {
        Self(requests)
    }

    /// Plan deploying the named contracts without constructor arguments.
    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        names.into_iter().map(Request::new).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.0.iter()
    }
}

impl FromIterator<Request> for Plan {
    fn from_iter<T: IntoIterator<Item = Request>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
