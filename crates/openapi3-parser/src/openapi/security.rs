use super::uri;
use crate::error::Result;
use crate::node::{object_node, NodeList, NodeMap};
use crate::node_factory::{ArrayFactory, Factory, FieldSpec, InputType, MapFactory, ObjectSchema};
use once_cell::sync::Lazy;

const SCHEME_TYPES: [&str; 4] = ["apiKey", "http", "oauth2", "openIdConnect"];

/// Names of security schemes to the scopes they require.
pub type SecurityRequirement = NodeMap<NodeList<String>>;

pub(crate) fn requirements() -> ArrayFactory {
    ArrayFactory::new(MapFactory::new(ArrayFactory::new(InputType::String)))
}

pub static SECURITY_SCHEME: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("SecurityScheme")
        .allow_extensions()
        .field(FieldSpec::new("type", InputType::String).required().validate(|value| {
            match value.as_str() {
                Some(scheme_type) if SCHEME_TYPES.contains(&scheme_type) => None,
                _ => Some(format!("type must be one of: {}", SCHEME_TYPES.join(", "))),
            }
        }))
        .field(FieldSpec::new("description", InputType::String))
        .field(FieldSpec::new("name", InputType::String))
        .field(FieldSpec::new("in", InputType::String))
        .field(FieldSpec::new("scheme", InputType::String))
        .field(FieldSpec::new("bearerFormat", InputType::String))
        .field(FieldSpec::new("flows", Factory::object(&OAUTH_FLOWS)))
        .field(FieldSpec::new("openIdConnectUrl", InputType::String).validate(uri))
});

pub static OAUTH_FLOWS: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("OauthFlows")
        .allow_extensions()
        .field(FieldSpec::new("implicit", Factory::object(&OAUTH_FLOW)))
        .field(FieldSpec::new("password", Factory::object(&OAUTH_FLOW)))
        .field(FieldSpec::new("clientCredentials", Factory::object(&OAUTH_FLOW)))
        .field(FieldSpec::new("authorizationCode", Factory::object(&OAUTH_FLOW)))
});

pub static OAUTH_FLOW: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new("OauthFlow")
        .allow_extensions()
        .field(FieldSpec::new("authorizationUrl", InputType::String).validate(uri))
        .field(FieldSpec::new("tokenUrl", InputType::String).validate(uri))
        .field(FieldSpec::new("refreshUrl", InputType::String).validate(uri))
        .field(FieldSpec::new("scopes", MapFactory::new(InputType::String)).required())
});

object_node!(SecurityScheme);

impl SecurityScheme {
    /// One of `apiKey`, `http`, `oauth2` or `openIdConnect`.
    pub fn scheme_type(&self) -> &str {
        self.0.string("type").unwrap_or_default()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn location(&self) -> Option<&str> {
        self.0.string("in")
    }

    pub fn scheme(&self) -> Option<&str> {
        self.0.string("scheme")
    }

    pub fn bearer_format(&self) -> Option<&str> {
        self.0.string("bearerFormat")
    }

    pub fn flows(&self) -> Result<Option<OauthFlows>> {
        self.0.child("flows")
    }

    pub fn open_id_connect_url(&self) -> Option<&str> {
        self.0.string("openIdConnectUrl")
    }
}

object_node!(OauthFlows);

impl OauthFlows {
    pub fn implicit(&self) -> Result<Option<OauthFlow>> {
        self.0.child("implicit")
    }

    pub fn password(&self) -> Result<Option<OauthFlow>> {
        self.0.child("password")
    }

    pub fn client_credentials(&self) -> Result<Option<OauthFlow>> {
        self.0.child("clientCredentials")
    }

    pub fn authorization_code(&self) -> Result<Option<OauthFlow>> {
        self.0.child("authorizationCode")
    }
}

object_node!(OauthFlow);

impl OauthFlow {
    pub fn authorization_url(&self) -> Option<&str> {
        self.0.string("authorizationUrl")
    }

    pub fn token_url(&self) -> Option<&str> {
        self.0.string("tokenUrl")
    }

    pub fn refresh_url(&self) -> Option<&str> {
        self.0.string("refreshUrl")
    }

    /// Scope names to their descriptions.
    pub fn scopes(&self) -> Result<Option<NodeMap<String>>> {
        self.0.child("scopes")
    }
}
