//! Static table of the data catalogue datasets exposed as tools.

use crate::domains::tools::definitions::common::FilterField;

/// A data catalogue dataset and the filters its tool accepts.
#[derive(Debug)]
pub struct Dataset {
    /// Tool name as registered in MCP.
    pub tool_name: &'static str,

    /// Value of the `id` query parameter.
    pub id: &'static str,

    /// Tool description shown to clients.
    pub description: &'static str,

    /// Accepted filters, in the order they are sent to the API.
    pub fields: &'static [FilterField],
}

const AGE: FilterField = FilterField::string(
    "age",
    "Either all age groups ('overall') or five-year age groups e.g. 0-4, 5-9, 10-14, etc. 85+ is the oldest category",
);

const ETHNICITY: FilterField = FilterField::string(
    "ethnicity",
    "All ethnic groups ('overall'), Malay ('bumi_malay'), other Bumiputera ('bumi_other'), Chinese ('chinese'), Indian ('indian'), other citizens ('other_citizen'), or non-citizen residents ('other_noncitizen')",
);

const ANNUAL_DATE: FilterField = FilterField::string(
    "date",
    "The date in YYYY-MM-DD format, with MM-DD set to 01-01 as this is annual data",
);

pub static POPULATION_MALAYSIA: Dataset = Dataset {
    tool_name: "population_malaysia",
    id: "population_malaysia",
    description: "Population at national level from 1970 to 2024, by sex, age group and ethnicity",
    fields: &[
        AGE,
        FilterField::string(
            "sex",
            "Either both sexes ('both'), male ('male') or female ('female')",
        ),
        ETHNICITY,
        ANNUAL_DATE,
    ],
};

pub static POPULATION_STATE: Dataset = Dataset {
    tool_name: "population_state",
    id: "population_state",
    description: "Population at state level from 1970 to 2024, by sex, age group and ethnicity",
    fields: &[
        AGE,
        FilterField::string("sex", "Male ('male') or female ('female'). Can't use ('both')"),
        ETHNICITY,
        ANNUAL_DATE,
        FilterField::string("state", "One of 16 states"),
    ],
};

pub static BIRTHS: Dataset = Dataset {
    tool_name: "births",
    id: "births",
    description: "Number of people born daily in Malaysia, based on registrations with JPN from 1920 to the present",
    fields: &[
        FilterField::string(
            "date",
            "Date of birth in YYYY-MM-DD format; note that this date represents the actual date of birth and NOT the date of registration with JPN",
        ),
        FilterField::number("births", "Number of births for the date"),
    ],
};

pub static FUELPRICE: Dataset = Dataset {
    tool_name: "fuelprice",
    id: "fuelprice",
    description: "Weekly retail prices of RON95 petrol, RON97 petrol, and diesel in Malaysia",
    fields: &[
        FilterField::string(
            "date",
            "The date of effect of the price, in YYYY-MM-DD format. You can omit this field if not found any data",
        ),
        FilterField::string(
            "series_type",
            "Price in RM (level), or weekly change in RM (change_weekly).",
        ),
    ],
};

pub static HH_INCOME: Dataset = Dataset {
    tool_name: "hh_income",
    id: "hh_income",
    description: "Mean and median monthly gross household income in Malaysia from 1970 to 2022",
    fields: &[FilterField::string(
        "date",
        "The date in YYYY-MM-DD format, with MM-DD set to 01-01 as the data is at annual frequency",
    )],
};

/// Every catalogue dataset, in registration order.
pub static ALL_DATASETS: [&Dataset; 5] = [
    &POPULATION_MALAYSIA,
    &POPULATION_STATE,
    &BIRTHS,
    &FUELPRICE,
    &HH_INCOME,
];

impl Dataset {
    /// Look up a catalogue dataset by its tool name.
    pub fn by_tool_name(name: &str) -> Option<&'static Dataset> {
        ALL_DATASETS.iter().copied().find(|d| d.tool_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_are_unique() {
        let names: HashSet<_> = ALL_DATASETS.iter().map(|d| d.tool_name).collect();
        assert_eq!(names.len(), ALL_DATASETS.len());
    }

    #[test]
    fn test_filter_names_unique_per_dataset() {
        for dataset in ALL_DATASETS {
            let args: HashSet<_> = dataset.fields.iter().map(|f| f.arg).collect();
            assert_eq!(args.len(), dataset.fields.len(), "{}", dataset.tool_name);
        }
    }

    #[test]
    fn test_by_tool_name() {
        assert_eq!(Dataset::by_tool_name("hh_income").map(|d| d.id), Some("hh_income"));
        assert!(Dataset::by_tool_name("registration_transactions_car").is_none());
    }
}
