//! The error-code catalog behind `dockerlint explain`.

pub const AVAILABLE_CODES: &[(&str, &str)] = &[
    ("CasingInstruction", "Instruction keyword doesn't match the casing of the rest of the file"),
    ("CasingDirective", "Parser directive name isn't lowercase"),
    ("ArgumentMissing", "Instruction has no arguments where one or more is required"),
    ("ArgumentExtra", "Instruction has more arguments than it accepts"),
    ("ArgumentRequiresOne", "Instruction requires exactly one argument"),
    ("ArgumentRequiresAtLeastOne", "Instruction requires at least one argument"),
    ("ArgumentRequiresTwo", "Instruction requires exactly two arguments"),
    ("ArgumentRequiresAtLeastTwo", "Instruction requires at least two arguments"),
    ("ArgumentRequiresOneOrThree", "Instruction requires one or three arguments"),
    ("ArgumentUnnecessary", "Argument is ignored given the instruction's other arguments"),
    ("DuplicateBuildStageName", "Two `FROM ... AS <name>` stages share a name"),
    ("EmptyContinuationLine", "A line continuation resolves to an empty line"),
    ("InvalidBuildStageName", "Build stage name doesn't start with a letter or contains invalid characters"),
    ("FlagAtLeastOne", "Flag's numeric value must be at least one"),
    ("FlagDuplicate", "The same flag is set more than once"),
    ("FlagInvalidDuration", "Duration flag value isn't a valid duration"),
    ("FlagLessThan1ms", "Duration flag value resolves to less than one millisecond"),
    ("FlagMissingDuration", "Duration flag value has no magnitude/unit pairs"),
    ("FlagMissingValue", "Flag requires a value but none was given"),
    ("FlagUnknownUnit", "Duration flag uses a unit other than ns/us/ms/s/m/h"),
    ("FlagExpectedBooleanValue", "Boolean flag's value isn't \"true\" or \"false\""),
    ("FlagInvalidFromValue", "`--from` doesn't reference a known stage, image, or build context"),
    ("NoSourceImage", "File has no `FROM` instruction before its first non-ARG instruction"),
    ("InvalidEscapeDirective", "`# escape=` directive's value isn't `\\` or `` ` ``"),
    ("DuplicatedEscapeDirective", "`# escape=` directive appears more than once"),
    ("InvalidAs", "`FROM ... AS` stage name is malformed"),
    ("InvalidDestination", "ADD/COPY destination is malformed"),
    ("InvalidPort", "EXPOSE argument isn't a valid port or port range"),
    ("InvalidProto", "EXPOSE port's protocol isn't tcp, udp, or sctp"),
    ("InvalidReferenceFormat", "FROM image reference doesn't match the tag/digest grammar"),
    ("InvalidSignal", "STOPSIGNAL value isn't a `SIG*` name or a plain integer"),
    ("InvalidSyntax", "Argument's value doesn't parse under the expected grammar"),
    ("OnbuildChainingDisallowed", "`ONBUILD ONBUILD ...` is not allowed"),
    ("OnbuildTriggerDisallowed", "`ONBUILD FROM`/`ONBUILD MAINTAINER` is not allowed"),
    ("ShellJsonForm", "SHELL requires a JSON array of strings, not shell form"),
    ("ShellRequiresOne", "SHELL's JSON array has no elements"),
    ("SyntaxMissingEquals", "ARG/ENV/LABEL property has a name but no `=`"),
    ("SyntaxMissingNames", "ARG/ENV/LABEL has no properties at all"),
    ("SyntaxMissingSingleQuote", "Property value's single quote isn't closed"),
    ("SyntaxMissingDoubleQuote", "Property value's double quote isn't closed"),
    ("MultipleInstructions", "CMD/ENTRYPOINT/HEALTHCHECK appears more than once in a stage"),
    ("UnknownInstruction", "Line's first token isn't a recognized Dockerfile instruction"),
    ("UnknownAddFlag", "ADD was given a flag it doesn't accept"),
    ("UnknownCopyFlag", "COPY was given a flag it doesn't accept"),
    ("UnknownFromFlag", "FROM was given a flag it doesn't accept"),
    ("UnknownHealthcheckFlag", "HEALTHCHECK was given a flag it doesn't accept"),
    ("UnknownType", "HEALTHCHECK's first argument isn't NONE or CMD"),
    ("UnsupportedModifier", "Variable's `:modifier` isn't `-`, `+`, or `?`"),
    ("DeprecatedMaintainer", "MAINTAINER is deprecated in favor of a LABEL"),
    ("HealthcheckCmdArgumentMissing", "`HEALTHCHECK CMD` has no command to run"),
    ("JsonInSingleQuotes", "Exec-form argument looks like JSON but uses single quotes"),
    ("WorkdirIsNotAbsolute", "WORKDIR argument isn't an absolute path"),
    ("BaseNameEmpty", "FROM's image reference has an empty name"),
];

pub fn list_rules() -> String {
    use std::fmt::Write;
    let mut out = String::from("Error codes:\n\n");
    for (name, desc) in AVAILABLE_CODES {
        let _ = writeln!(out, "  {name:<32} {desc}");
    }
    out.push_str("\nRun `dockerlint explain <code>` for one code's description.");
    out
}

pub fn explain(code: &str) -> Option<&'static str> {
    AVAILABLE_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(code))
        .map(|(_, desc)| *desc)
}
