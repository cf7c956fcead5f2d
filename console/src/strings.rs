macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod input {
    define_strings! {
        ANNOTATION =
            "Path of the GFF-like feature annotation (tab-separated, nine \
            columns). Files ending in .gz are decompressed when built with \
            the `compression` feature.";
        CONFIRMED =
            "Path of the confirmed insertion table. Tab-separated with a \
            header containing `Target Gene`, `T-DNA line`, `Hit region`, \
            `HM` and `ABRC`.";
        LOCATIONS =
            "Path of the headerless insertion coordinate table. The first \
            column holds the line label and the fifth a position field such \
            as `8864721-8864722 vs 0-0`.";
        CONFIG =
            "JSON file overriding the eligibility rules, the coordinate \
            table layout or the feature types reported in bundles. Omitted \
            fields keep their defaults.";
    }
}

pub mod query {
    define_strings! {
        GENE =
            "Gene identifier, e.g. AT1G25320. Matching is case-insensitive.";
        OUTPUT =
            "Write the result to this file instead of standard output.";
        JSON =
            "Print the load report as JSON.";
    }
}

pub mod utils {
    define_strings! {
        VERBOSE =
            "Increase log verbosity (-v info, -vv debug, -vvv trace). \
            RUST_LOG takes precedence when set.";
        THREADS =
            "Number of threads used to parse the input tables.";
    }
}
