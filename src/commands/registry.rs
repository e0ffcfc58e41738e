use once_cell::sync::Lazy;

use super::builtins;
use super::{Registration, registration};

/// The built-in catalog. Dispatchers copy these at construction, so
/// runtime `bind`/`unbind` changes never leak across sessions.
static BUILTINS: Lazy<Vec<Registration>> = Lazy::new(|| {
    // single point of registration
    vec![
        registration::<builtins::ChangeNode>(),
        registration::<builtins::PrintPath>(),
        registration::<builtins::ListChildren>(),
        registration::<builtins::ChangeStore>(),
        registration::<builtins::PrintStore>(),
        registration::<builtins::ChangeLanguage>(),
        registration::<builtins::PrintLanguage>(),
        registration::<builtins::ChangeVersion>(),
        registration::<builtins::PrintVersion>(),
        registration::<builtins::ListVersions>(),
        registration::<builtins::GetAttribute>(),
        registration::<builtins::GetFields>(),
        registration::<builtins::SetField>(),
        registration::<builtins::CreateNode>(),
        registration::<builtins::DeleteNode>(),
        registration::<builtins::EchoInput>(),
        registration::<builtins::SetVariable>(),
        registration::<builtins::ManageAliases>(),
        registration::<builtins::ManageBindings>(),
        registration::<builtins::IfCondition>(),
        registration::<builtins::RepeatCommand>(),
        registration::<builtins::SplitInput>(),
        registration::<builtins::ReplaceText>(),
        registration::<builtins::FindNodes>(),
        registration::<builtins::RandomNumber>(),
        registration::<builtins::ExitShell>(),
        registration::<builtins::ShowHelp>(),
        registration::<builtins::ListScripts>(),
    ]
});

pub fn built_in_commands() -> &'static [Registration] {
    &BUILTINS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<&str> = built_in_commands().iter().map(|r| r.name).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn every_entry_has_help() {
        for reg in built_in_commands() {
            let details = (reg.help)();
            assert!(!details.description.is_empty(), "{} has no description", reg.name);
            assert!(details.usage.starts_with(reg.name));
        }
    }
}
