use crate::core::capability::{Role, RoleRegistry};
use crate::core::identity::Identity;

const DEFAULT_PORT: u16 = 3040;
const DEFAULT_ADDRESS: &str = "http://127.0.0.1:3040";

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2).filter(|w| w[0] == flag).map(|w| w[1].clone()).collect()
}

#[derive(Debug, Clone)]
pub(crate) struct ProviderConfig {
    pub port: u16,
    pub admins: Vec<Identity>,
    pub minters: Vec<Identity>,
    pub burners: Vec<Identity>,
}

impl ProviderConfig {
    pub fn from_args(args: &[String]) -> Self {
        let port: u16 = match flag_value(args, "--p") {
            Some(port) => port.parse().unwrap_or(DEFAULT_PORT),
            None => DEFAULT_PORT,
        };
        let ids = |flag: &str| -> Vec<Identity> {
            flag_values(args, flag).into_iter().map(Identity::new).collect()
        };
        Self {
            port,
            admins: ids("--admin"),
            minters: ids("--minter"),
            burners: ids("--burner"),
        }
    }

    pub fn roles(&self) -> RoleRegistry {
        let registry = self.admins.iter().cloned()
            .fold(RoleRegistry::new(), |r, id| r.with_admin(id));
        let registry = self.minters.iter().cloned()
            .fold(registry, |r, id| r.with_role(Role::Minter, id));
        self.burners.iter().cloned()
            .fold(registry, |r, id| r.with_role(Role::Burner, id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Create,
    Destroy,
    Acquire,
    Release,
    State,
    Spots,
    Index,
}

impl Command {
    fn parse(cmd: &str) -> Option<Self> {
        match cmd.to_ascii_lowercase().as_str() {
            "create" => Some(Command::Create),
            "destroy" => Some(Command::Destroy),
            "acquire" => Some(Command::Acquire),
            "release" => Some(Command::Release),
            "state" => Some(Command::State),
            "spots" => Some(Command::Spots),
            "index" => Some(Command::Index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    pub address: String,
    pub caller: Identity,
    pub command: Command,
}

impl ClientConfig {
    /// `None` when `--caller` or a known `--cmd` is missing.
    pub fn from_args(args: &[String]) -> Option<Self> {
        let address = flag_value(args, "--addr").unwrap_or(DEFAULT_ADDRESS.to_string());
        let caller = Identity::new(flag_value(args, "--caller")?);
        let command = Command::parse(&flag_value(args, "--cmd")?)?;
        Some(Self { address, caller, command })
    }
}
