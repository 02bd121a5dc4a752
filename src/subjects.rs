/// Subject codes offered in the timetable's subject control, in the order
/// a full harvest walks them.
pub const SUBJECT_CODES: &[&str] = &[
    "AAD", "AAEC", "ACIS", "ADV", "AFST", "AHRM", "AINS", "AIS", "ALCE", "ALS",
    "AOE", "APS", "APSC", "ARBC", "ARCH", "ART", "AS", "ASPT", "AT", "BC",
    "BCHM", "BDS", "BIOL", "BIT", "BMES", "BMSP", "BMVS", "BSE", "CEE",
    "CEM", "CHE", "CHEM", "CHN", "CINE", "CLA", "CMDA", "CMST", "CNST", "COMM",
    "CONS", "COS", "CRIM", "CS", "CSES", "DANC", "DASC", "ECE", "ECON", "EDCI",
    "EDCO", "EDCT", "EDEL", "EDEP", "EDHE", "EDIT", "EDP", "EDRE", "EDTE", "ENGE",
    "ENGL", "ENGR", "ENSC", "ENT", "ESM", "FIN", "FIW", "FL", "FMD", "FR",
    "FREC", "FST", "GBCB", "GEOG", "GEOS", "GER", "GIA", "GR", "GRAD", "HD",
    "HEB", "HIST", "HNFE", "HORT", "HTM", "HUM", "IDS", "IS", "ISC", "ISE",
    "ITAL", "ITDS", "JMC", "JPN", "JUD", "LAHS", "LAR", "LAT", "LDRS", "MACR",
    "MATH", "ME", "MGT", "MINE", "MKTG", "MN", "MS", "MSE", "MTRG", "MUS",
    "NANO", "NEUR", "NR", "NSEG", "PAPA", "PHIL", "PHS", "PHYS", "PM", "PORT",
    "PPE", "PPWS", "PR", "PSCI", "PSVP", "PSYC", "REAL", "RED", "RLCL", "RTM",
    "RUS", "SBIO", "SOC", "SPAN", "SPES", "SPIA", "STAT", "STL", "STS", "SYSB",
    "TA", "TBMH", "UAP", "UH", "UNIV", "VM", "WATR", "WGS",
];

pub fn default_subjects() -> Vec<String> {
    SUBJECT_CODES.iter().map(|s| s.to_string()).collect()
}

/// Cleans up user-supplied codes: trimmed, upper-cased, blanks and repeats
/// dropped, first occurrence order kept.
pub fn normalize_subjects<I, T>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for code in codes {
        let code = code.as_ref().trim().to_ascii_uppercase();
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}
