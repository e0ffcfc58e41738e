mod cd;
mod pwd;
mod ls;
mod store;
mod language;
mod version;
mod ga;
mod gf;
mod sf;
mod create;
mod rm;
mod echo;
mod set_var;
mod alias;
mod bind;
mod conditional;
mod repeat;
mod split;
mod replace;
mod find;
mod random;
mod exit;
mod help;
mod scripts;

pub use alias::ManageAliases;
pub use bind::ManageBindings;
pub use cd::ChangeNode;
pub use conditional::IfCondition;
pub use create::CreateNode;
pub use echo::EchoInput;
pub use exit::ExitShell;
pub use find::FindNodes;
pub use ga::GetAttribute;
pub use gf::GetFields;
pub use help::ShowHelp;
pub use language::{ChangeLanguage, PrintLanguage};
pub use ls::ListChildren;
pub use pwd::PrintPath;
pub use random::RandomNumber;
pub use repeat::RepeatCommand;
pub use replace::ReplaceText;
pub use rm::DeleteNode;
pub use scripts::ListScripts;
pub use set_var::SetVariable;
pub use sf::SetField;
pub use split::SplitInput;
pub use store::{ChangeStore, PrintStore};
pub use version::{ChangeVersion, ListVersions, PrintVersion};
