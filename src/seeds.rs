//! Built-in question bank and roster, used when no TOML config supplies them.

use crate::domain::{Student, Test};

const FIBONACCI_LIKE_SNIPPET: &str = r#"int main()
{int a[21]={0,1,1},i;
 for(i=1;i<21;i++)
   if(i<3) printf("%d ",a[i]);
     else printf("%d ",______);
 printf("\n when n is 20: %d\n",a[20]);
 return 0;
}"#;

/// Ten tests per category.
pub fn seed_tests() -> Vec<Test> {
  vec![
    Test::english("E001", "Translate the following text into English.", 2, "Smooth, fluent and without language problems or wrong words", "C-E"),
    Test::english("E002", "Translate the following article content.", 3, "Clear logic and no language problems", "E-C"),
    Test::english("E003", "Choose the correct answer based on the content being played.", 3, "Correct answer", "Hearing"),
    Test::english("E004", "Translate the following Chinese in English.", 2, "No grammatical errors", "C-E"),
    Test::english("E005", "Translate the following English in Chinese.", 2, "Sentence fluent", "E-C"),
    Test::english("E006", "Choose the correct answer based on contextual dialogue", 2, "Right", "Hearing"),
    Test::english("E007", "Translate the following article content.", 3, "Smooth and fluent", "C-E"),
    Test::english("E008", "Translate to Chinese", 3, "Complete translation", "E-C"),
    Test::english("E009", "Listen to the dialogue and choose Xiao Ming's weekend schedule.", 3, "Correct answer", "Hearing"),
    Test::english("E010", "Translate the following text into English.", 2, "Use the correct words and smooth", "C-E"),

    Test::math("M001", "Find the inflection points of the following functions.", 2, "Right", "no image", "no"),
    Test::math("M002", "Which of the following series converge?", 3, "Right", "no image", "no"),
    Test::math("M003", "Find the differential equation of the following function.", 3, "Necessary problem-solving process", "no image", "The first step is to find the integral. The second step is to find the value of the constant c."),
    Test::math("M004", "Find the angle between the two planes A and B.", 2, "Correct answer", "http://image.com/m004", "no"),
    Test::math("M005", "Several extreme points in the figure below.", 3, "Right", "http://image.com/m005", "no"),
    Test::math("M006", "Find the inflection points of the following functions.", 2, "Right", "no image", "no"),
    Test::math("M007", "Find the differential equation of the following function.", 3, "Clear problem solving process and correct value", "no image", "Find the value of the constant b and the differential equation"),
    Test::math("M008", "The area enclosed by the following curve and the coordinate axis is?", 1, "Correct answer", "http://image.com/m008", "no"),
    Test::math("M009", "Find general solutions of differential equations.", 2, "The parameters are correct", "no image", "Find the value of the parameter"),
    Test::math("M010", "Find the function f(x).", 2, "Right", "http://image.com/m009", "no"),

    Test::professional("P001", "What are the characteristics of JAVA language?", 1, "Right", "Name at least three of the characteristics", "no", "no image"),
    Test::professional("P002", "Fill in the following blanks to realize the calculation of the sum of the numbers between 1-200 that are not divisible by 5.", 2, "Correct result at run", "Fill in the code in the blank.", "no", "http://image.com/p002"),
    Test::professional("P003", "The time complexity of the algorithm refers to?", 1, "Correct answer", "no", "no", "no image"),
    Test::professional("P004", "The number sequence is: 1,1,1,2,3,4,6,...", 3, "Correct result at run", "Calculation formula when filling in n.", FIBONACCI_LIKE_SNIPPET, "no image"),
    Test::professional("P005", "The design of the database includes two aspects of design content, they are?", 2, "Similar in meaning", "no", "no", "no image"),
    Test::professional("P006", "The difference between java and c.", 2, "At least three points", "At least three points", "no", "no image"),
    Test::professional("P007", "The difference between process and thread.", 3, "At least three points", "At least three points", "no", "no image"),
    Test::professional("P008", "The time complexity of the following code is?", 1, "Right", "no", "no", "http://image.com/p008"),
    Test::professional("P009", "Benefits of thread pool.", 3, "Can name the key benefits", "no", "no", "no image"),
    Test::professional("P010", "Enter 5 numbers to find their maximum and average.", 3, "Correct result at run", "Time complexity cannot exceed n.", "no", "no image"),
  ]
}

pub fn seed_students() -> Vec<Student> {
  [
    ("2019213001", "吴广胜"),
    ("2019213002", "陈盛典"),
    ("2019213003", "刘子豪"),
    ("2019213004", "仇历"),
    ("2019213005", "郑西泽"),
    ("2019213006", "李梦琪"),
    ("2019213007", "王志"),
    ("2019213008", "张天一"),
    ("2019213009", "周琳琳"),
    ("2019213010", "周爽"),
    ("2019213011", "张涵"),
    ("2019213012", "李依然"),
    ("2019213013", "孟子涛"),
    ("2019213014", "腊志翱"),
    ("2019213015", "张一鸣"),
    ("2019213016", "李华"),
    ("2019213017", "冷子晴"),
    ("2019213018", "金灿"),
    ("2019213019", "朱文杰"),
    ("2019213020", "刘美含"),
  ]
  .into_iter()
  .map(|(id, name)| Student::new(id, name))
  .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  use crate::domain::{CategoryCounts, Category};
  use crate::util::{is_valid_student_id, is_valid_student_name};

  #[test]
  fn bank_is_balanced_and_unique() {
    let tests = seed_tests();
    let counts = CategoryCounts::from_tests(&tests);
    for c in Category::ALL {
      assert_eq!(counts.get(c), 10);
    }
    let codes: HashSet<_> = tests.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes.len(), tests.len());
  }

  #[test]
  fn roster_entries_pass_validation() {
    let students = seed_students();
    assert_eq!(students.len(), 20);
    for s in &students {
      assert!(is_valid_student_id(s.id()), "{}", s.id());
      assert!(is_valid_student_name(s.name()), "{}", s.name());
    }
  }
}
