//! Prompt template for ticket comparison.

/// Build the comparison prompt for two ticket summaries.
///
/// Asks for a YES/NO verdict and a similarity score from 0 to 1.
pub fn comparison_prompt(summary_a: &str, summary_b: &str) -> String {
    format!(
        "Are the following two ticket summaries describing the same underlying issue? \
         Respond YES or NO and provide a similarity score from 0 to 1.\n\n\
         Summary 1:\n{}\n\nSummary 2:\n{}\n",
        summary_a, summary_b
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_summaries_in_order() {
        let prompt = comparison_prompt("VPN is down", "Cannot reach VPN");
        let first = prompt.find("Summary 1:\nVPN is down").unwrap();
        let second = prompt.find("Summary 2:\nCannot reach VPN").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Respond YES or NO"));
        assert!(prompt.ends_with("Cannot reach VPN\n"));
    }
}
